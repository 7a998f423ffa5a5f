//! JSON export implementation.
//!
//! Exports the selected components with their direct children and parents
//! in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable component for JSON output.
#[derive(Serialize)]
struct JsonComponent {
    path: String,
    children: Vec<String>,
    parents: Vec<String>,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    components: Vec<String>,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    total_components: usize,
    total_edges: usize,
    total_cycles: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    summary: JsonSummary,
    components: Vec<JsonComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycles: Vec<JsonCycle>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let display = |idx| data.display_path(idx).display().to_string();

        let components: Vec<JsonComponent> = data
            .roots
            .iter()
            .map(|&idx| JsonComponent {
                path: display(idx),
                children: data.graph.children(idx).into_iter().map(display).collect(),
                parents: data.graph.parents(idx).into_iter().map(display).collect(),
            })
            .collect();

        let cycles: Vec<JsonCycle> = data
            .cycles()
            .iter()
            .map(|c| JsonCycle {
                components: c
                    .nodes
                    .iter()
                    .map(|p| crate::graph::relative_to(p, data.prefix).display().to_string())
                    .collect(),
                path: c.cycle_path(data.prefix),
            })
            .collect();

        let export = JsonExport {
            summary: JsonSummary {
                total_components: data.graph.node_count(),
                total_edges: data.graph.edge_count(),
                total_cycles: cycles.len(),
            },
            components,
            cycles,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
