//! Unordered set of vertex names.
//!
//! [`VertexSet`] is the currency of every graph query: membership and insert
//! are O(1), and [`VertexSet::sorted`] gives the deterministic ordering used
//! wherever a set leaves the core (text output, build matrices, tests).

use std::collections::HashSet;
use std::collections::hash_set;

/// A set of component names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexSet {
    members: HashSet<String>,
}

impl VertexSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. Returns `true` if it was not already present.
    pub fn insert(&mut self, vertex: impl Into<String>) -> bool {
        self.members.insert(vertex.into())
    }

    /// Returns `true` if `vertex` is a member.
    #[must_use]
    pub fn contains(&self, vertex: &str) -> bool {
        self.members.contains(vertex)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members of `self` or `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.members.union(&other.members).cloned().collect()
    }

    /// Members of `self` that are not in `other`.
    #[must_use]
    pub fn without(&self, other: &Self) -> Self {
        self.members.difference(&other.members).cloned().collect()
    }

    /// Members of both `self` and `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.members
            .intersection(&other.members)
            .cloned()
            .collect()
    }

    /// Iterate members in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Members in lexicographic order.
    #[must_use]
    pub fn sorted(&self) -> Vec<String> {
        let mut members: Vec<String> = self.members.iter().cloned().collect();
        members.sort_unstable();
        members
    }
}

impl<S: Into<String>> FromIterator<S> for VertexSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for VertexSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.members.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for VertexSet {
    type Item = String;
    type IntoIter = hash_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a VertexSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
