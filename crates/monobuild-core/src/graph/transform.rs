//! Graph-to-graph transformations. Each returns a fresh [`Graph`].

use std::collections::HashMap;

use crate::graph::{Adjacency, Graph, Kind};
use crate::set::VertexSet;

impl Graph {
    /// Invert every edge, keeping its kind.
    ///
    /// The vertex set is preserved: a vertex whose edges were all outgoing is
    /// still present afterwards, with no edges.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut reversed: HashMap<String, Adjacency> = HashMap::with_capacity(self.vertex_count());

        for (source, targets) in self.adjacency() {
            reversed.entry(source.clone()).or_default();

            for (target, kind) in targets {
                reversed
                    .entry(target.clone())
                    .or_default()
                    .insert(source.clone(), *kind);
            }
        }

        Self::from_normalized(reversed)
    }

    /// Restrict the graph to `nodes`.
    ///
    /// Vertices outside `nodes` are dropped, along with any edge that has an
    /// endpoint outside `nodes`. Names in `nodes` the graph does not know are
    /// ignored.
    #[must_use]
    pub fn subgraph(&self, nodes: &VertexSet) -> Self {
        let filtered = self
            .adjacency()
            .filter(|(vertex, _)| nodes.contains(vertex))
            .map(|(vertex, targets)| {
                let kept: Adjacency = targets
                    .iter()
                    .filter(|(target, _)| nodes.contains(target))
                    .map(|(target, kind)| (target.clone(), *kind))
                    .collect();
                (vertex.clone(), kept)
            })
            .collect();

        Self::from_normalized(filtered)
    }

    /// Keep every vertex but only edges whose kind is in `kinds`.
    ///
    /// `filter_edges(&[Kind::Strong])` is the build schedule.
    #[must_use]
    pub fn filter_edges(&self, kinds: &[Kind]) -> Self {
        let filtered = self
            .adjacency()
            .map(|(vertex, targets)| {
                let kept: Adjacency = targets
                    .iter()
                    .filter(|(_, kind)| kinds.contains(kind))
                    .map(|(target, kind)| (target.clone(), *kind))
                    .collect();
                (vertex.clone(), kept)
            })
            .collect();

        Self::from_normalized(filtered)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::tests::example;
    use crate::graph::{Edge, Graph, Kind};
    use crate::set::VertexSet;

    fn set(members: &[&str]) -> VertexSet {
        members.iter().copied().collect()
    }

    // ------------------------------------------------------------------
    // reverse
    // ------------------------------------------------------------------

    #[test]
    fn reverse_inverts_edges_and_keeps_kinds() {
        let reversed = example().reverse();

        let expected = Graph::new([
            ("a", vec![Edge::strong("d"), Edge::strong("e")]),
            ("b", vec![Edge::weak("a"), Edge::strong("e")]),
            ("c", vec![Edge::weak("a"), Edge::weak("b")]),
            ("d", vec![]),
            ("e", vec![]),
        ]);

        assert_eq!(reversed, expected);
    }

    #[test]
    fn reverse_keeps_sources_without_incoming_edges() {
        let reversed = Graph::new([("app", vec![Edge::weak("lib")])]).reverse();
        assert_eq!(reversed.vertices(), vec!["app", "lib"]);
        assert!(reversed.edges("app").is_empty());
    }

    #[test]
    fn double_reverse_is_identity() {
        let graph = example();
        assert_eq!(graph.reverse().reverse(), graph);
    }

    #[test]
    fn reverse_leaves_receiver_untouched() {
        let graph = example();
        let _ = graph.reverse();
        assert_eq!(graph, example());
    }

    // ------------------------------------------------------------------
    // subgraph
    // ------------------------------------------------------------------

    #[test]
    fn subgraph_of_nothing_is_empty() {
        assert_eq!(example().subgraph(&VertexSet::new()).vertex_count(), 0);
    }

    #[test]
    fn subgraph_drops_edges_leaving_the_set() {
        let sub = example().subgraph(&set(&["a", "b", "d"]));

        let expected = Graph::new([
            ("a", vec![Edge::weak("b")]),
            ("b", vec![]),
            ("d", vec![Edge::strong("a")]),
        ]);

        assert_eq!(sub, expected);
    }

    #[test]
    fn subgraph_ignores_unknown_nodes() {
        let sub = example().subgraph(&set(&["c", "zzz"]));
        assert_eq!(sub.vertices(), vec!["c"]);
    }

    // ------------------------------------------------------------------
    // filter_edges
    // ------------------------------------------------------------------

    #[test]
    fn strong_filter_is_the_build_schedule() {
        let schedule = example().filter_edges(&[Kind::Strong]);

        let expected = Graph::new([
            ("a", vec![]),
            ("b", vec![]),
            ("c", vec![]),
            ("d", vec![Edge::strong("a")]),
            ("e", vec![Edge::strong("a"), Edge::strong("b")]),
        ]);

        assert_eq!(schedule, expected);
    }

    #[test]
    fn filter_keeps_all_vertices_even_with_no_kinds() {
        let graph = example();
        let bare = graph.filter_edges(&[]);
        assert_eq!(bare.vertices(), graph.vertices());
        assert_eq!(bare.edge_count(), 0);
    }

    #[test]
    fn filter_with_all_kinds_is_identity() {
        let graph = example();
        assert_eq!(graph.filter_edges(&[Kind::Weak, Kind::Strong]), graph);
    }
}
