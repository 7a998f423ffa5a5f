//! UI module for vuedeps.
//!
//! This module turns a built component graph into text trees for the
//! terminal.

pub mod tree;

pub use tree::{RenderConfig, TreeLine, TreeRenderer};
