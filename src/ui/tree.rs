//! Tree rendering for component dependencies.
//!
//! A render starts at one root component and follows either its children or
//! its parents, as deep as the graph goes. The walk is first flattened into
//! [`TreeLine`]s, which carry everything needed to draw the box-drawing
//! prefix of their row, then each line is formatted.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::style::{style, Color, Stylize};

use crate::graph::{ComponentGraph, NodeIndex, Traversal};

/// Branch for a node with later siblings.
pub const BRANCH_MID: &str = "├── ";
/// Branch for the last node of its sibling group.
pub const BRANCH_LAST: &str = "└── ";
/// Indent unit under an ancestor that still has siblings to draw.
pub const CONTINUATION: &str = "│   ";
/// Indent unit under an ancestor that was last in its group.
pub const BLANK: &str = "    ";
/// Appended to a node that is already on the path from the root.
pub const CYCLE_MARKER: &str = " (cycle)";

/// Rendering options.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// One path per line, without indentation or branch glyphs
    pub flat: bool,
    /// Color the root line, green for children and red for parents
    pub color: bool,
    /// Stripped from every displayed path
    pub root_label_prefix: PathBuf,
}

impl RenderConfig {
    pub fn new(root_label_prefix: impl Into<PathBuf>) -> Self {
        Self {
            root_label_prefix: root_label_prefix.into(),
            ..Self::default()
        }
    }

    pub fn flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Root line color for a traversal direction.
pub fn root_color(traversal: Traversal) -> Color {
    match traversal {
        Traversal::Children => Color::Green,
        Traversal::Parents => Color::Red,
    }
}

/// One visited node, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    /// The component on this line
    pub node: NodeIndex,
    /// Distance from the root (0 = root)
    pub depth: usize,
    /// Whether this is the last node of its sibling group
    pub is_last_child: bool,
    /// Per ancestor below the root: whether that ancestor has later siblings
    pub open_ancestors: Vec<bool>,
    /// Whether the node already appears between the root and this line
    pub is_cycle: bool,
}

impl TreeLine {
    /// Build the tree prefix (indentation and branch lines)
    pub fn tree_prefix(&self) -> String {
        let mut prefix = String::with_capacity((self.open_ancestors.len() + 1) * CONTINUATION.len());

        for &open in &self.open_ancestors {
            prefix.push_str(if open { CONTINUATION } else { BLANK });
        }

        if self.depth > 0 {
            prefix.push_str(if self.is_last_child { BRANCH_LAST } else { BRANCH_MID });
        }

        prefix
    }
}

/// Renders trees of one graph in one direction.
pub struct TreeRenderer<'a> {
    graph: &'a ComponentGraph,
    traversal: Traversal,
    config: &'a RenderConfig,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(graph: &'a ComponentGraph, traversal: Traversal, config: &'a RenderConfig) -> Self {
        Self {
            graph,
            traversal,
            config,
        }
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Flattens the tree under `root` into render order.
    ///
    /// A node that is already an ancestor of the current position is listed
    /// once with `is_cycle` set and is not expanded again, so the walk ends
    /// on cyclic graphs.
    pub fn flatten(&self, root: NodeIndex) -> Vec<TreeLine> {
        let mut lines = Vec::new();
        let mut open_ancestors = Vec::new();
        let mut on_path = HashSet::new();
        self.flatten_recursive(root, true, 0, &mut open_ancestors, &mut on_path, &mut lines);
        lines
    }

    fn flatten_recursive(
        &self,
        node: NodeIndex,
        is_last_child: bool,
        depth: usize,
        open_ancestors: &mut Vec<bool>,
        on_path: &mut HashSet<NodeIndex>,
        lines: &mut Vec<TreeLine>,
    ) {
        let is_cycle = on_path.contains(&node);
        lines.push(TreeLine {
            node,
            depth,
            is_last_child,
            open_ancestors: open_ancestors.clone(),
            is_cycle,
        });

        if is_cycle {
            return;
        }

        on_path.insert(node);
        // The root draws no column of its own.
        if depth > 0 {
            open_ancestors.push(!is_last_child);
        }

        let next = self.graph.neighbors(node, self.traversal);
        let count = next.len();
        for (i, child) in next.into_iter().enumerate() {
            self.flatten_recursive(child, i + 1 == count, depth + 1, open_ancestors, on_path, lines);
        }

        if depth > 0 {
            open_ancestors.pop();
        }
        on_path.remove(&node);
    }

    /// Formats one flattened line, without the trailing newline.
    pub fn format_line(&self, line: &TreeLine) -> String {
        let path = self
            .graph
            .component(line.node)
            .relative_path(&self.config.root_label_prefix)
            .display()
            .to_string();

        let label = if self.config.color && line.depth == 0 {
            style(path).with(root_color(self.traversal)).to_string()
        } else {
            path
        };

        let prefix = if self.config.flat { String::new() } else { line.tree_prefix() };
        let marker = if line.is_cycle { CYCLE_MARKER } else { "" };
        format!("{prefix}{label}{marker}")
    }

    /// Writes the tree under `root`, one line per visited node.
    pub fn render<W: Write>(&self, root: NodeIndex, writer: &mut W) -> io::Result<()> {
        for line in self.flatten(root) {
            writeln!(writer, "{}", self.format_line(&line))?;
        }
        Ok(())
    }

    /// Renders the tree under `root` into a string.
    pub fn render_to_string(&self, root: NodeIndex) -> String {
        let mut buffer = Vec::new();
        self.render(root, &mut buffer)
            .expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Component, ComponentSet};
    use std::path::Path;

    fn graph(components: &[(&str, &[&str])]) -> ComponentGraph {
        let set: ComponentSet = components
            .iter()
            .map(|(path, refs)| {
                Component::new(
                    format!("/p/{path}"),
                    "",
                    refs.iter().map(|r| PathBuf::from(format!("/p/{r}"))).collect(),
                )
            })
            .collect();
        ComponentGraph::build(set)
    }

    fn render(graph: &ComponentGraph, root: &str, traversal: Traversal, config: &RenderConfig) -> String {
        let idx = graph.node(&Path::new("/p").join(root)).unwrap();
        TreeRenderer::new(graph, traversal, config).render_to_string(idx)
    }

    fn chain() -> ComponentGraph {
        graph(&[("A", &["B"]), ("B", &["C"]), ("C", &[])])
    }

    #[test]
    fn test_children_chain() {
        let config = RenderConfig::new("/p");
        assert_eq!(
            render(&chain(), "A", Traversal::Children, &config),
            "A\n└── B\n    └── C\n"
        );
    }

    #[test]
    fn test_parents_chain() {
        let config = RenderConfig::new("/p");
        assert_eq!(
            render(&chain(), "C", Traversal::Parents, &config),
            "C\n└── B\n    └── A\n"
        );
    }

    #[test]
    fn test_leaf_renders_alone() {
        let config = RenderConfig::new("/p");
        assert_eq!(render(&chain(), "C", Traversal::Children, &config), "C\n");
        assert_eq!(render(&chain(), "A", Traversal::Parents, &config), "A\n");
    }

    #[test]
    fn test_multi_child_glyphs() {
        let graph = graph(&[
            ("Root", &["First", "Second"]),
            ("First", &["Deep"]),
            ("Second", &["Other"]),
            ("Deep", &[]),
            ("Other", &[]),
        ]);
        let config = RenderConfig::new("/p");

        let expected = "\
Root
├── First
│   └── Deep
└── Second
    └── Other
";
        assert_eq!(render(&graph, "Root", Traversal::Children, &config), expected);
    }

    #[test]
    fn test_deep_continuation_columns() {
        let graph = graph(&[
            ("R", &["A", "B"]),
            ("A", &["A1", "A2"]),
            ("A1", &["X"]),
            ("A2", &[]),
            ("B", &[]),
            ("X", &[]),
        ]);
        let config = RenderConfig::new("/p");

        let expected = "\
R
├── A
│   ├── A1
│   │   └── X
│   └── A2
└── B
";
        assert_eq!(render(&graph, "R", Traversal::Children, &config), expected);
    }

    #[test]
    fn test_flat_mode() {
        let graph = graph(&[("R", &["A", "B"]), ("A", &["C"]), ("B", &[]), ("C", &[])]);
        let config = RenderConfig::new("/p").flat(true);

        assert_eq!(render(&graph, "R", Traversal::Children, &config), "R\nA\nC\nB\n");
    }

    #[test]
    fn test_flat_and_tree_share_order() {
        let graph = graph(&[("R", &["A", "B"]), ("A", &["C", "B"]), ("B", &[]), ("C", &[])]);
        let tree_config = RenderConfig::new("/p");
        let flat_config = RenderConfig::new("/p").flat(true);

        let tree = render(&graph, "R", Traversal::Children, &tree_config);
        let flat = render(&graph, "R", Traversal::Children, &flat_config);

        let stripped: Vec<&str> = tree
            .lines()
            .map(|line| line.trim_start_matches(|c: char| "│├└─ ".contains(c)))
            .collect();
        let flat_lines: Vec<&str> = flat.lines().collect();
        assert_eq!(stripped, flat_lines);
        assert!(flat_lines.iter().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn test_color_root_only() {
        let config = RenderConfig::new("/p").color(true);

        let children = render(&chain(), "A", Traversal::Children, &config);
        let green = style("A").with(Color::Green).to_string();
        assert_eq!(children, format!("{green}\n└── B\n    └── C\n"));

        let parents = render(&chain(), "C", Traversal::Parents, &config);
        let red = style("C").with(Color::Red).to_string();
        assert_eq!(parents, format!("{red}\n└── B\n    └── A\n"));
    }

    #[test]
    fn test_color_applies_when_flat() {
        let config = RenderConfig::new("/p").color(true).flat(true);

        let green = style("A").with(Color::Green).to_string();
        assert_eq!(
            render(&chain(), "A", Traversal::Children, &config),
            format!("{green}\nB\nC\n")
        );

        let red = style("C").with(Color::Red).to_string();
        assert_eq!(
            render(&chain(), "C", Traversal::Parents, &config),
            format!("{red}\nB\nA\n")
        );
    }

    #[test]
    fn test_cycle_is_marked_and_terminates() {
        let graph = graph(&[("Bike", &["Car"]), ("Car", &["Train"]), ("Train", &["Bike"])]);
        let config = RenderConfig::new("/p");

        assert_eq!(
            render(&graph, "Bike", Traversal::Children, &config),
            "Bike\n└── Car\n    └── Train\n        └── Bike (cycle)\n"
        );
        assert_eq!(
            render(&graph, "Bike", Traversal::Parents, &config),
            "Bike\n└── Train\n    └── Car\n        └── Bike (cycle)\n"
        );
    }

    #[test]
    fn test_self_reference_cycle() {
        let graph = graph(&[("Self", &["Self"])]);
        let config = RenderConfig::new("/p");
        assert_eq!(
            render(&graph, "Self", Traversal::Children, &config),
            "Self\n└── Self (cycle)\n"
        );

        let flat = RenderConfig::new("/p").flat(true);
        assert_eq!(
            render(&graph, "Self", Traversal::Children, &flat),
            "Self\nSelf (cycle)\n"
        );
    }

    #[test]
    fn test_flat_cycle_keeps_marker() {
        let graph = graph(&[("A", &["B"]), ("B", &["A"])]);
        let config = RenderConfig::new("/p").flat(true);

        let output = render(&graph, "A", Traversal::Children, &config);
        assert_eq!(output, "A\nB\nA (cycle)\n");
        assert!(output.lines().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn test_shared_node_is_not_a_cycle() {
        // Diamond: D is reached twice but never through itself.
        let graph = graph(&[("A", &["B", "C"]), ("B", &["D"]), ("C", &["D"]), ("D", &[])]);
        let config = RenderConfig::new("/p");

        let expected = "\
A
├── B
│   └── D
└── C
    └── D
";
        assert_eq!(render(&graph, "A", Traversal::Children, &config), expected);
    }

    #[test]
    fn test_prefix_outside_root_keeps_full_path() {
        let config = RenderConfig::new("/elsewhere");
        assert_eq!(render(&chain(), "C", Traversal::Children, &config), "/p/C\n");
    }

    #[test]
    fn test_flatten_lines() {
        let graph = graph(&[("R", &["A", "B"]), ("A", &[]), ("B", &[])]);
        let config = RenderConfig::new("/p");
        let root = graph.node(Path::new("/p/R")).unwrap();

        let lines = TreeRenderer::new(&graph, Traversal::Children, &config).flatten(root);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].depth, 0);
        assert!(lines[0].is_last_child);
        assert!(!lines[1].is_last_child);
        assert!(lines[2].is_last_child);
        assert!(lines.iter().all(|l| l.open_ancestors.is_empty() && !l.is_cycle));
    }

    #[test]
    fn test_tree_prefix() {
        let line = TreeLine {
            node: NodeIndex::new(0),
            depth: 3,
            is_last_child: false,
            open_ancestors: vec![true, false],
            is_cycle: false,
        };
        assert_eq!(line.tree_prefix(), "│       ├── ");

        let root = TreeLine {
            depth: 0,
            open_ancestors: vec![],
            ..line
        };
        assert_eq!(root.tree_prefix(), "");
    }
}
