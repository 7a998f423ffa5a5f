//! Export functionality for component graphs.
//!
//! Trees are the default output (see [`crate::ui::tree`]). This module adds
//! a machine-readable JSON dump of the selected components and a plain text
//! report of import cycles.

pub mod json;

use crate::graph::{ComponentGraph, CycleInfo, NodeIndex};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Box-drawing trees, one per root and direction
    #[default]
    Tree,
    /// JSON format - machine-readable adjacency lists
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(ExportFormat::Tree),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown output format: '{}'. Valid formats: tree, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Tree => write!(f, "tree"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone, Copy)]
pub struct ExportData<'a> {
    /// The built graph
    pub graph: &'a ComponentGraph,
    /// Components to describe, in output order
    pub roots: &'a [NodeIndex],
    /// Stripped from every exported path
    pub prefix: &'a Path,
}

impl<'a> ExportData<'a> {
    pub fn new(graph: &'a ComponentGraph, roots: &'a [NodeIndex], prefix: &'a Path) -> Self {
        Self {
            graph,
            roots,
            prefix,
        }
    }

    /// Display path of a node.
    pub fn display_path(&self, idx: NodeIndex) -> PathBuf {
        self.graph.component(idx).relative_path(self.prefix).to_path_buf()
    }

    /// Import cycles anywhere in the graph.
    pub fn cycles(&self) -> Vec<CycleInfo> {
        self.graph.detect_cycles()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()>;
}

/// Writes one `a -> b -> a` line per cycle under a heading.
///
/// Nothing is written when there are no cycles.
pub fn write_cycle_report<W: Write>(
    cycles: &[CycleInfo],
    prefix: &Path,
    writer: &mut W,
) -> io::Result<()> {
    if cycles.is_empty() {
        return Ok(());
    }

    writeln!(writer, "Circular dependencies:")?;
    for cycle in cycles {
        writeln!(writer, "  {}", cycle.cycle_path(prefix))?;
    }
    Ok(())
}
