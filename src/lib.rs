//! vuedeps - import tree explorer for single-file UI components
//!
//! This crate discovers which components import which in a project tree and
//! renders the result as dependency trees, in either the "depends on" or the
//! "depended on by" direction.

pub mod analysis;
pub mod app;
pub mod export;
pub mod graph;
pub mod parser;
pub mod ui;
