//! Run orchestration: scan, build, select roots, write output.

use std::io::Write;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::analysis::{scan_project, AnalysisResult, FileSystem};
use crate::export::{json::JsonExporter, write_cycle_report, ExportData, ExportFormat, Exporter};
use crate::graph::{ComponentGraph, NodeIndex, Traversal};
use crate::parser::{ImportResolver, DEFAULT_EXTENSION};
use crate::ui::tree::{RenderConfig, TreeRenderer};

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory that is walked; root-relative imports and displayed paths
    /// are anchored here
    pub project_root: PathBuf,
    /// Components to render, relative to the project root; empty means all
    pub targets: Vec<PathBuf>,
    pub show_children: bool,
    pub show_parents: bool,
    pub flat: bool,
    pub color: bool,
    /// Component file extension, without the dot
    pub extension: String,
    pub format: ExportFormat,
    /// Append a report of import cycles
    pub cycles: bool,
}

impl Options {
    /// Options that render every component's children.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            targets: Vec::new(),
            show_children: true,
            show_parents: false,
            flat: false,
            color: false,
            extension: DEFAULT_EXTENSION.to_string(),
            format: ExportFormat::Tree,
            cycles: false,
        }
    }

    pub fn shows_all_targets(&self) -> bool {
        self.targets.is_empty()
    }

    fn render_config(&self) -> RenderConfig {
        RenderConfig::new(&self.project_root)
            .flat(self.flat)
            .color(self.color)
    }
}

/// Scans the project and writes the requested output to `writer`.
///
/// # Example
///
/// ```
/// use vuedeps::analysis::MemoryFileSystem;
/// use vuedeps::app::{run, Options};
///
/// let fs = MemoryFileSystem::new()
///     .with_file("/p/A.vue", "<script>import B from './B'</script>")
///     .with_file("/p/B.vue", "");
///
/// let mut out = Vec::new();
/// run(&fs, &Options::new("/p"), &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "A.vue\n└── B.vue\nB.vue\n");
/// ```
pub fn run<F, W>(fs: &F, options: &Options, writer: &mut W) -> AnalysisResult<()>
where
    F: FileSystem + ?Sized,
    W: Write,
{
    let resolver = ImportResolver::with_extension(&options.project_root, &options.extension);
    let set = scan_project(fs, &resolver)?;
    let graph = ComponentGraph::build(set);
    let roots = select_roots(&graph, &options.project_root, &options.targets);

    match options.format {
        ExportFormat::Tree => write_trees(&graph, &roots, options, writer)?,
        ExportFormat::Json => {
            let data = ExportData::new(&graph, &roots, &options.project_root);
            JsonExporter.export(&data, writer)?;
        }
    }

    if options.cycles && options.format == ExportFormat::Tree {
        write_cycle_report(&graph.detect_cycles(), &options.project_root, writer)?;
    }

    Ok(())
}

/// Picks the components to render, in sorted path order.
///
/// With no targets every component is a root. Otherwise a component is
/// listed once for each target naming it.
pub fn select_roots(graph: &ComponentGraph, project_root: &Path, targets: &[PathBuf]) -> Vec<NodeIndex> {
    if targets.is_empty() {
        return graph.sorted_indices();
    }

    let wanted: Vec<PathBuf> = targets.iter().map(|t| project_root.join(t).clean()).collect();

    for (target, path) in targets.iter().zip(&wanted) {
        if !graph.contains(path) {
            tracing::warn!(target = %target.display(), "target matches no component");
        }
    }

    graph
        .sorted_indices()
        .into_iter()
        .flat_map(|idx| {
            let path = &graph.component(idx).path;
            let hits = wanted.iter().filter(|w| *w == path).count();
            std::iter::repeat(idx).take(hits)
        })
        .collect()
}

fn write_trees<W: Write>(
    graph: &ComponentGraph,
    roots: &[NodeIndex],
    options: &Options,
    writer: &mut W,
) -> std::io::Result<()> {
    let config = options.render_config();

    let directions = [
        (options.show_children, Traversal::Children),
        (options.show_parents, Traversal::Parents),
    ];

    for (enabled, traversal) in directions {
        if !enabled {
            continue;
        }

        let renderer = TreeRenderer::new(graph, traversal, &config);
        for &root in roots {
            renderer.render(root, writer)?;
        }
    }

    Ok(())
}
