//! Validated project model and the two planning entry points.
//!
//! A [`Project`] is built from a clean [`ReadOutcome`]; it owns the full
//! dependency graph and the strong-only build schedule derived from it.
//! [`Project::print_plan`] starts from every component,
//! [`Project::diff_plan`] from the components impacted by a change. Both end
//! in a [`Plan`] whose graphs are restricted to the selection.

use tracing::{debug, instrument};

use crate::diff::{filter_components, impacted};
use crate::error::{LoadError, ScopeError};
use crate::graph::{Graph, Kind};
use crate::manifest::{Dependencies, ReadOutcome};
use crate::selection::{Scope, Selection};
use crate::set::VertexSet;

/// Components and their graphs, free of manifest errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    components: Vec<String>,
    dependencies: Graph,
    schedule: Graph,
}

/// What to show or build: the selected components and the graphs between
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Full dependency graph restricted to the selection.
    pub dependencies: Graph,
    /// Strong-only graph restricted to the selection.
    pub schedule: Graph,
    /// Selected components, sorted.
    pub selection: Vec<String>,
}

impl Project {
    #[must_use]
    pub fn new(components: Vec<String>, dependencies: &Dependencies) -> Self {
        let dependencies = dependencies.as_graph();
        let schedule = dependencies.filter_edges(&[Kind::Strong]);

        Self {
            components,
            dependencies,
            schedule,
        }
    }

    /// Build a project from a manifest read.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] carrying every accumulated manifest error.
    pub fn load(outcome: ReadOutcome) -> Result<Self, LoadError> {
        let (components, dependencies) = outcome.into_result()?;
        Ok(Self::new(components, &dependencies))
    }

    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    #[must_use]
    pub const fn dependencies(&self) -> &Graph {
        &self.dependencies
    }

    #[must_use]
    pub const fn schedule(&self) -> &Graph {
        &self.schedule
    }

    /// Plan over every component, narrowed by `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] if the scope names an unknown component.
    #[instrument(skip(self), fields(components = self.components.len()))]
    pub fn print_plan(&self, scope: &Scope) -> Result<Plan, ScopeError> {
        let selection = Selection::new(&self.components, self.dependencies.vertices()).refine(
            scope,
            &self.dependencies,
            &self.schedule,
            false,
        )?;

        Ok(self.plan(selection))
    }

    /// Plan over the components impacted by `changed_files`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] if the scope names an unknown component.
    #[instrument(skip(self, changed_files), fields(changed_files = changed_files.len()))]
    pub fn diff_plan(
        &self,
        changed_files: &[String],
        scope: &Scope,
        rebuild_strong: bool,
    ) -> Result<Plan, ScopeError> {
        let changed = filter_components(&self.components, changed_files);
        debug!(changed = changed.len(), "changed components");

        let base = impacted(&changed, &self.dependencies);
        let selection = Selection::new(&self.components, base).refine(
            scope,
            &self.dependencies,
            &self.schedule,
            rebuild_strong,
        )?;

        Ok(self.plan(selection))
    }

    fn plan(&self, selection: Selection) -> Plan {
        let selected: &VertexSet = selection.selected();

        Plan {
            dependencies: self.dependencies.subgraph(selected),
            schedule: self.schedule.subgraph(selected),
            selection: selection.into_sorted(),
        }
    }
}
