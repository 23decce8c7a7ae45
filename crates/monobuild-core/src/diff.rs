//! Impact analysis: from changed files to the components that must build.
//!
//! ```text
//! changed files ─→ filter_components() ─→ changed components
//!                                          ↓ impacted(_, dependencies)
//!                  changed ∪ reverse(dependencies).descendants(changed)
//! ```
//!
//! Dependents, not dependencies, are affected by a change, which is why the
//! reverse graph is walked.

use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::set::VertexSet;

/// Components that own at least one of `changed_files`.
///
/// A file belongs to a component when the component path followed by `/` is
/// a prefix of the file path, so `a/component` does not claim files under
/// `a/component-v2/`. The result keeps the order of `components`.
#[must_use]
pub fn filter_components(components: &[String], changed_files: &[String]) -> Vec<String> {
    components
        .iter()
        .filter(|component| {
            let prefix = format!("{component}/");
            changed_files.iter().any(|file| file.starts_with(&prefix))
        })
        .cloned()
        .collect()
}

/// Changed components plus everything that transitively depends on them,
/// through weak or strong edges, sorted.
#[must_use]
#[instrument(skip_all, fields(changed = changed.len()))]
pub fn impacted(changed: &[String], dependencies: &Graph) -> Vec<String> {
    let changed: VertexSet = changed.iter().map(String::as_str).collect();
    let dependents = dependencies.reverse().descendants(&changed);
    let impacted = dependents.union(&changed);

    debug!(impacted = impacted.len(), "computed impacted components");

    impacted.sorted()
}
