//! Post-processing of a candidate component set before output.
//!
//! A [`Selection`] starts from a base set (every component for `print`, the
//! impacted set for `diff`) and is refined by pure, consuming steps:
//!
//! 1. [`Selection::scope_to`]: keep one component and what it depends on.
//! 2. [`Selection::only_top`]: keep components nothing depends on.
//! 3. [`Selection::add_strong`]: pull in what the selection strongly
//!    depends on, transitively.
//!
//! [`Selection::refine`] applies them in that order. Strong widening must run
//! last: widening before scoping would admit components that scoping is meant
//! to exclude.

use tracing::debug;

use crate::error::ScopeError;
use crate::graph::Graph;
use crate::set::VertexSet;

/// Output restriction requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Restrict to this component and its transitive dependencies.
    pub component: Option<String>,
    /// Restrict to components with no dependents.
    pub top_level: bool,
}

/// The evolving set of components to build or show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    components: VertexSet,
    selected: VertexSet,
}

impl Selection {
    /// Start from `base`, knowing the full list of `components`.
    #[must_use]
    pub fn new<S: Into<String>>(
        components: &[String],
        base: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            components: components.iter().map(String::as_str).collect(),
            selected: base.into_iter().collect(),
        }
    }

    /// Keep only `component` and everything it transitively depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NotAComponent`] if `component` is not known.
    pub fn scope_to(self, component: &str, dependencies: &Graph) -> Result<Self, ScopeError> {
        if !self.components.contains(component) {
            return Err(ScopeError::NotAComponent(component.to_string()));
        }

        let root: VertexSet = std::iter::once(component).collect();
        let mut scoped = dependencies.descendants(&root);
        scoped.insert(component);

        Ok(Self {
            selected: self.selected.intersect(&scoped),
            ..self
        })
    }

    /// Keep only top-level components: those with no incoming edge in the
    /// dependency graph.
    #[must_use]
    pub fn only_top(self, dependencies: &Graph) -> Self {
        let reverse = dependencies.reverse();
        let top_level: VertexSet = dependencies
            .vertices()
            .into_iter()
            .filter(|vertex| reverse.edges(vertex).is_empty())
            .collect();

        Self {
            selected: self.selected.intersect(&top_level),
            ..self
        }
    }

    /// Add every descendant of the current selection in the strong-only
    /// `schedule`, so prerequisites that must build first are included.
    #[must_use]
    pub fn add_strong(self, schedule: &Graph) -> Self {
        let strong = schedule.descendants(&self.selected);

        Self {
            selected: self.selected.union(&strong),
            ..self
        }
    }

    /// Apply `scope`, then strong widening when `rebuild_strong` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] if the scope names an unknown component.
    pub fn refine(
        self,
        scope: &Scope,
        dependencies: &Graph,
        schedule: &Graph,
        rebuild_strong: bool,
    ) -> Result<Self, ScopeError> {
        let mut selection = self;

        if let Some(component) = &scope.component {
            selection = selection.scope_to(component, dependencies)?;
            debug!(component = %component, selected = selection.len(), "scoped selection");
        }

        if scope.top_level {
            selection = selection.only_top(dependencies);
            debug!(selected = selection.len(), "restricted to top-level");
        }

        if rebuild_strong {
            selection = selection.add_strong(schedule);
            debug!(selected = selection.len(), "added strong dependencies");
        }

        Ok(selection)
    }

    #[must_use]
    pub const fn selected(&self) -> &VertexSet {
        &self.selected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected components in lexicographic order.
    #[must_use]
    pub fn into_sorted(self) -> Vec<String> {
        self.selected.sorted()
    }
}
