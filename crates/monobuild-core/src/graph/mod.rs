//! Directed, edge-coloured dependency graph over component names.
//!
//! # Overview
//!
//! A [`Graph`] maps every known vertex to its outgoing edges. Each [`Edge`]
//! carries a [`Kind`]: an edge `A → B` of kind `Weak` means "A depends on B";
//! `Strong` additionally means "A may only build after B has built".
//!
//! ## Normalization
//!
//! Every vertex referenced anywhere, as a source or as a target, has an entry
//! in the map, possibly with no edges. Enumerating vertices therefore never
//! needs a second pass over edge targets.
//!
//! ## Immutability
//!
//! Graphs are values. [`Graph::reverse`], [`Graph::subgraph`] and
//! [`Graph::filter_edges`] return new graphs and leave the receiver alone.
//!
//! ## Cycles
//!
//! Cycles are tolerated, not rejected. Reachability queries in [`reach`] use a
//! frontier that never re-expands a visited vertex, so they terminate on any
//! input.
//!
//! ## Pipeline
//!
//! ```text
//! manifests ─→ Dependencies::as_graph() ─→ Graph (dependencies)
//!                                            ├─ filter_edges([Strong]) → build schedule
//!                                            └─ reverse()              → impact graph
//! ```

pub mod reach;
pub mod transform;

use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Kind / Edge
// ---------------------------------------------------------------------------

/// Strength of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    /// Changes propagate to the dependent, but builds may run in parallel.
    Weak,
    /// Changes propagate and the dependent builds only after the dependency.
    Strong,
}

/// An outgoing edge: target vertex plus its [`Kind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub target: String,
    pub kind: Kind,
}

impl Edge {
    #[must_use]
    pub fn new(target: impl Into<String>, kind: Kind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    #[must_use]
    pub fn weak(target: impl Into<String>) -> Self {
        Self::new(target, Kind::Weak)
    }

    #[must_use]
    pub fn strong(target: impl Into<String>) -> Self {
        Self::new(target, Kind::Strong)
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Edges leaving one vertex, keyed (and de-duplicated) by target.
type Adjacency = BTreeMap<String, Kind>;

/// A normalized directed graph with coloured edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    edges: HashMap<String, Adjacency>,
}

impl Graph {
    /// Build a graph from a vertex → edges mapping.
    ///
    /// Edge targets that are not keys are added as vertices with no edges.
    /// When the same target appears twice for one source, the first edge
    /// wins. Repeated source keys have their edge lists merged.
    #[must_use]
    pub fn new<V, E>(edges: impl IntoIterator<Item = (V, E)>) -> Self
    where
        V: Into<String>,
        E: IntoIterator<Item = Edge>,
    {
        let mut normalized: HashMap<String, Adjacency> = HashMap::new();

        for (vertex, outgoing) in edges {
            let vertex = vertex.into();
            let mut targets = Vec::new();
            {
                let adjacency = normalized.entry(vertex).or_default();
                for edge in outgoing {
                    adjacency.entry(edge.target.clone()).or_insert(edge.kind);
                    targets.push(edge.target);
                }
            }
            for target in targets {
                normalized.entry(target).or_default();
            }
        }

        Self { edges: normalized }
    }

    /// Wrap an adjacency map that is already normalized.
    pub(crate) const fn from_normalized(edges: HashMap<String, Adjacency>) -> Self {
        Self { edges }
    }

    /// All vertices in lexicographic order.
    #[must_use]
    pub fn vertices(&self) -> Vec<String> {
        let mut vertices: Vec<String> = self.edges.keys().cloned().collect();
        vertices.sort_unstable();
        vertices
    }

    /// Returns `true` if `vertex` is known to the graph.
    #[must_use]
    pub fn has_vertex(&self, vertex: &str) -> bool {
        self.edges.contains_key(vertex)
    }

    /// Outgoing edges of `vertex`, sorted by target. Unknown vertices have none.
    #[must_use]
    pub fn edges(&self, vertex: &str) -> Vec<Edge> {
        self.edges
            .get(vertex)
            .map(|adjacency| {
                adjacency
                    .iter()
                    .map(|(target, kind)| Edge::new(target.clone(), *kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub(crate) fn adjacency(&self) -> impl Iterator<Item = (&String, &Adjacency)> {
        self.edges.iter()
    }

    pub(crate) fn targets_of(&self, vertex: &str) -> Option<&Adjacency> {
        self.edges.get(vertex)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// a→b(weak), a→c(weak), b→c(weak), d→a(strong), e→a(strong), e→b(strong)
    pub(crate) fn example() -> Graph {
        Graph::new([
            ("a", vec![Edge::weak("b"), Edge::weak("c")]),
            ("b", vec![Edge::weak("c")]),
            ("c", vec![]),
            ("d", vec![Edge::strong("a")]),
            ("e", vec![Edge::strong("a"), Edge::strong("b")]),
        ])
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let graph = Graph::new(Vec::<(String, Vec<Edge>)>::new());
        assert_eq!(graph.vertex_count(), 0);
        assert!(graph.vertices().is_empty());
    }

    #[test]
    fn targets_become_vertices() {
        let graph = Graph::new([("app", vec![Edge::weak("lib")])]);
        assert_eq!(graph.vertices(), vec!["app", "lib"]);
        assert!(graph.edges("lib").is_empty());
    }

    #[test]
    fn vertices_are_sorted() {
        let graph = example();
        assert_eq!(graph.vertices(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn duplicate_targets_keep_first_kind() {
        let graph = Graph::new([("a", vec![Edge::weak("b"), Edge::strong("b")])]);
        assert_eq!(graph.edges("a"), vec![Edge::weak("b")]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn repeated_sources_merge_edges() {
        let graph = Graph::new([
            ("a", vec![Edge::weak("b")]),
            ("a", vec![Edge::strong("c")]),
        ]);
        assert_eq!(graph.edges("a"), vec![Edge::weak("b"), Edge::strong("c")]);
    }

    #[test]
    fn edges_of_unknown_vertex_are_empty() {
        assert!(example().edges("nope").is_empty());
        assert!(!example().has_vertex("nope"));
    }

    #[test]
    fn edges_are_sorted_by_target() {
        let graph = Graph::new([("a", vec![Edge::weak("z"), Edge::strong("m")])]);
        let targets: Vec<_> = graph.edges("a").into_iter().map(|e| e.target).collect();
        assert_eq!(targets, vec!["m", "z"]);
    }
}
