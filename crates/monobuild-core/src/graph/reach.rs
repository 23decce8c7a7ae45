//! Reachability queries: direct children and transitive descendants.
//!
//! Both queries are total. Vertices the graph has never seen simply have no
//! edges, so passing arbitrary names is not an error.

use tracing::trace;

use crate::graph::Graph;
use crate::set::VertexSet;

impl Graph {
    /// Union of the direct edge targets of `vertices`.
    #[must_use]
    pub fn children(&self, vertices: &VertexSet) -> VertexSet {
        let mut children = VertexSet::new();

        for vertex in vertices.iter() {
            if let Some(targets) = self.targets_of(vertex) {
                children.extend(targets.keys().map(String::as_str));
            }
        }

        children
    }

    /// Every vertex reachable from `vertices` by a path of length ≥ 1.
    ///
    /// The starting vertices are only included when a cycle leads back to
    /// them.
    ///
    /// # Algorithm
    ///
    /// Fixed-point over a frontier: start with the children of `vertices`,
    /// then repeatedly take the children of the most recently discovered
    /// vertices, minus everything already found. A vertex is expanded at most
    /// once, which bounds the work on cyclic graphs.
    #[must_use]
    pub fn descendants(&self, vertices: &VertexSet) -> VertexSet {
        let mut descendants = self.children(vertices);
        let mut frontier = descendants.clone();
        let mut rounds = 0_usize;

        while !frontier.is_empty() {
            let discovered = self.children(&frontier).without(&descendants);
            descendants.extend(discovered.iter());
            frontier = discovered;
            rounds += 1;
        }

        trace!(
            start = vertices.len(),
            found = descendants.len(),
            rounds,
            "descendants"
        );

        descendants
    }
}
