//! Project analysis module for vuedeps.
//!
//! Walks a project tree, keeps the component files, and resolves each
//! file's imports into candidate paths.
//!
//! File access goes through the [`FileSystem`] trait. [`OsFileSystem`] is
//! the real disk; [`MemoryFileSystem`] serves tests and embedders.
//!
//! # Example
//!
//! ```no_run
//! use vuedeps::analysis::{scan_project, OsFileSystem};
//! use vuedeps::graph::ComponentGraph;
//! use vuedeps::parser::ImportResolver;
//!
//! let resolver = ImportResolver::new(std::env::current_dir()?);
//! let set = scan_project(&OsFileSystem, &resolver)?;
//! let graph = ComponentGraph::build(set);
//! println!("{} components", graph.node_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod fs;
pub mod project;

pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem, WalkEntry};
pub use project::{load_component, scan_project, AnalysisError, AnalysisResult};
