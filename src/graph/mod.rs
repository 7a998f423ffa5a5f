//! Graph module for component import relationships.
//!
//! This module provides the [`ComponentGraph`] struct, built once from a
//! [`ComponentSet`] and read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use std::path::{Path, PathBuf};
//! use vuedeps::graph::{Component, ComponentGraph, ComponentSet, Traversal};
//!
//! let mut set = ComponentSet::new();
//! set.insert(Component::new("/p/App.vue", "", vec![PathBuf::from("/p/Nav.vue")]));
//! set.insert(Component::new("/p/Nav.vue", "", vec![]));
//!
//! let graph = ComponentGraph::build(set);
//! let nav = graph.node(Path::new("/p/Nav.vue")).unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.neighbors(nav, Traversal::Parents).len(), 1);
//! ```

mod component_graph;

pub use component_graph::{
    relative_to, Component, ComponentGraph, ComponentSet, CycleInfo, Traversal,
};
pub use petgraph::graph::NodeIndex;
