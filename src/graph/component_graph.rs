//! Component dependency graph implementation using petgraph.
//!
//! [`ComponentSet`] collects the discovered components while the project is
//! scanned. [`ComponentGraph::build`] consumes it and links every component
//! to the components it imports. The resulting graph is read-only.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

/// One discovered component file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Absolute path of the file; unique within a set
    pub path: PathBuf,
    /// Raw text of the embedded script block
    pub script: String,
    /// Resolved import paths, sorted, possibly duplicated or dangling
    pub candidate_refs: Vec<PathBuf>,
}

impl Component {
    /// Creates a new component.
    pub fn new(path: impl Into<PathBuf>, script: impl Into<String>, candidate_refs: Vec<PathBuf>) -> Self {
        Self {
            path: path.into(),
            script: script.into(),
            candidate_refs,
        }
    }

    /// Returns the path with `prefix` stripped, for display.
    pub fn relative_path(&self, prefix: &Path) -> &Path {
        relative_to(&self.path, prefix)
    }
}

/// Strips `prefix` from `path`, returning `path` unchanged when it lies
/// outside `prefix`.
pub fn relative_to<'a>(path: &'a Path, prefix: &Path) -> &'a Path {
    path.strip_prefix(prefix).unwrap_or(path)
}

fn by_path_text(a: &Path, b: &Path) -> std::cmp::Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

/// Components keyed by path, before any edges exist.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    components: HashMap<PathBuf, Component>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component, returning the one it replaced if the path was
    /// already present.
    pub fn insert(&mut self, component: Component) -> Option<Component> {
        self.components.insert(component.path.clone(), component)
    }

    pub fn get(&self, path: &Path) -> Option<&Component> {
        self.components.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.components.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components ordered byte-wise by path.
    pub fn sorted(&self) -> Vec<&Component> {
        let mut sorted: Vec<_> = self.components.values().collect();
        sorted.sort_by(|a, b| by_path_text(&a.path, &b.path));
        sorted
    }

    fn into_sorted(self) -> Vec<Component> {
        let mut sorted: Vec<_> = self.components.into_values().collect();
        sorted.sort_by(|a, b| by_path_text(&a.path, &b.path));
        sorted
    }
}

impl FromIterator<Component> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut set = ComponentSet::new();
        for component in iter {
            set.insert(component);
        }
        set
    }
}

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Traversal {
    /// Components the current one imports
    #[default]
    Children,
    /// Components that import the current one
    Parents,
}

impl Traversal {
    fn direction(self) -> Direction {
        match self {
            Traversal::Children => Direction::Outgoing,
            Traversal::Parents => Direction::Incoming,
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Children => write!(f, "children"),
            Traversal::Parents => write!(f, "parents"),
        }
    }
}

/// A directed graph of component imports.
///
/// Nodes live in petgraph's arena and are addressed by [`NodeIndex`]. Edges
/// point from the importing component to the imported one, so a node's
/// outgoing neighbors are its children and its incoming neighbors are its
/// parents. Both sides of every edge are created together in
/// [`ComponentGraph::build`], which is the only way to add edges.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use vuedeps::graph::{Component, ComponentGraph, ComponentSet};
///
/// let set: ComponentSet = vec![
///     Component::new("/p/A.vue", "", vec![PathBuf::from("/p/B.vue")]),
///     Component::new("/p/B.vue", "", vec![]),
/// ]
/// .into_iter()
/// .collect();
///
/// let graph = ComponentGraph::build(set);
/// let a = graph.node(Path::new("/p/A.vue")).unwrap();
/// let b = graph.node(Path::new("/p/B.vue")).unwrap();
///
/// assert_eq!(graph.children(a), vec![b]);
/// assert_eq!(graph.parents(b), vec![a]);
/// ```
#[derive(Debug, Clone)]
pub struct ComponentGraph {
    graph: DiGraph<Component, ()>,
    node_indices: HashMap<PathBuf, NodeIndex>,
}

impl ComponentGraph {
    /// Links every component in `set` to the components it imports.
    ///
    /// Components are visited in sorted path order and their candidate
    /// references in stored order. A reference with no matching component is
    /// dropped. Self references produce a self edge.
    pub fn build(set: ComponentSet) -> Self {
        let components = set.into_sorted();
        let edge_hint = components.iter().map(|c| c.candidate_refs.len()).sum();

        let mut graph = DiGraph::with_capacity(components.len(), edge_hint);
        let mut node_indices = HashMap::with_capacity(components.len());

        for component in components {
            let path = component.path.clone();
            let idx = graph.add_node(component);
            node_indices.insert(path, idx);
        }

        // Node indices were assigned in sorted order.
        for from in graph.node_indices() {
            let targets: Vec<NodeIndex> = graph[from]
                .candidate_refs
                .iter()
                .filter_map(|candidate| match node_indices.get(candidate) {
                    Some(&to) => Some(to),
                    None => {
                        tracing::debug!(
                            importer = %graph[from].path.display(),
                            candidate = %candidate.display(),
                            "dropping reference with no matching component"
                        );
                        None
                    }
                })
                .collect();

            for to in targets {
                graph.add_edge(from, to, ());
            }
        }

        tracing::info!(
            components = graph.node_count(),
            edges = graph.edge_count(),
            "component graph built"
        );

        Self { graph, node_indices }
    }

    /// Looks up the node for a component path.
    pub fn node(&self, path: &Path) -> Option<NodeIndex> {
        self.node_indices.get(path).copied()
    }

    /// Returns the component stored at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    pub fn component(&self, idx: NodeIndex) -> &Component {
        &self.graph[idx]
    }

    /// Gets a component by path.
    pub fn get(&self, path: &Path) -> Option<&Component> {
        self.node(path).map(|idx| &self.graph[idx])
    }

    /// Components `idx` imports, in the order their references were stored.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Traversal::Children)
    }

    /// Components importing `idx`, in the order the importers were processed.
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Traversal::Parents)
    }

    /// Neighbors of `idx` along `traversal`, in edge insertion order.
    pub fn neighbors(&self, idx: NodeIndex, traversal: Traversal) -> Vec<NodeIndex> {
        // petgraph yields the most recently added edge first.
        let mut neighbors: Vec<_> = self
            .graph
            .neighbors_directed(idx, traversal.direction())
            .collect();
        neighbors.reverse();
        neighbors
    }

    /// All nodes in sorted path order.
    pub fn sorted_indices(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    /// All components in sorted path order.
    pub fn sorted(&self) -> Vec<&Component> {
        self.graph.node_weights().collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_indices.contains_key(path)
    }

    /// Checks if any component (transitively) imports itself.
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Detects import cycles.
    ///
    /// Each strongly connected component with more than one member holds a
    /// cycle, as does a single component importing itself. Every reported
    /// cycle follows real import edges: it starts at the member with the
    /// smallest path and takes the shortest route back to it. Cycles are
    /// sorted by their first member.
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        let mut cycles: Vec<CycleInfo> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .filter_map(|scc| self.walk_cycle(&scc))
            .map(|walk| CycleInfo {
                nodes: walk.into_iter().map(|idx| self.graph[idx].path.clone()).collect(),
            })
            .collect();

        cycles.sort_by(|a, b| by_path_text(&a.nodes[0], &b.nodes[0]));
        cycles
    }

    /// Breadth-first search inside one strongly connected component for the
    /// shortest edge path from its smallest member back to itself.
    fn walk_cycle(&self, scc: &[NodeIndex]) -> Option<Vec<NodeIndex>> {
        let start = scc
            .iter()
            .copied()
            .min_by(|&a, &b| by_path_text(&self.graph[a].path, &self.graph[b].path))?;

        if scc.len() == 1 {
            return Some(vec![start]);
        }

        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let mut came_from: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            for next in self.children(node) {
                // A self loop is not a route through the other members.
                if next == node || !members.contains(&next) {
                    continue;
                }

                if next == start {
                    let mut walk = vec![node];
                    let mut current = node;
                    while let Some(&previous) = came_from.get(&current) {
                        walk.push(previous);
                        current = previous;
                    }
                    walk.reverse();
                    return Some(walk);
                }

                if !came_from.contains_key(&next) {
                    came_from.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

/// Information about a detected import cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The component paths along the cycle; each imports the next and the
    /// last imports the first
    pub nodes: Vec<PathBuf>,
}

impl CycleInfo {
    /// Returns the cycle as `a -> b -> a`, with `prefix` stripped from each
    /// path.
    pub fn cycle_path(&self, prefix: &Path) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };

        let mut parts: Vec<String> = self
            .nodes
            .iter()
            .map(|p| relative_to(p, prefix).display().to_string())
            .collect();
        parts.push(relative_to(first, prefix).display().to_string());
        parts.join(" -> ")
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
