//! Error types for manifest loading and selection.
//!
//! Manifest problems are accumulated: one [`LoadError`] carries every
//! [`ManifestError`] found across all inputs, so a repository with many
//! broken manifests reports them in one pass.

use std::fmt;
use std::path::PathBuf;

/// A single problem found while reading or validating manifests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    /// The manifest source could not be read.
    #[error("cannot read dependency manifest {}: {}", .path.display(), .message)]
    Unreadable { path: PathBuf, message: String },

    /// A whole-repository manifest line is not `component: dep, dep, ...`.
    #[error(
        "bad line format: {line_number}: '{line}' expected 'component: dependency, dependency, ...'"
    )]
    BadLineFormat { line_number: usize, line: String },

    /// A dependency token that does not name anything.
    #[error("malformed dependency '{token}' of '{component}'")]
    MalformedDependency { component: String, token: String },

    /// A dependency on a name that is not a known component.
    #[error("unknown dependency '{dependency}' of '{component}'")]
    UnknownDependency {
        dependency: String,
        component: String,
    },

    /// The same component is declared more than once.
    #[error("component '{component}' is declared more than once")]
    DuplicateComponent { component: String },
}

/// Aggregate of every [`ManifestError`] from one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    errors: Vec<ManifestError>,
}

impl LoadError {
    /// Wrap a list of errors. Returns `None` when the list is empty.
    #[must_use]
    pub fn from_errors(errors: Vec<ManifestError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[ManifestError] {
        &self.errors
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot load dependencies:")?;
        for error in &self.errors {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

/// Selection refinement failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("cannot scope to '{0}', not a component")]
    NotAComponent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_list_is_not_an_error() {
        assert!(LoadError::from_errors(Vec::new()).is_none());
    }

    #[test]
    fn aggregate_lists_every_error_on_its_own_line() {
        let err = LoadError::from_errors(vec![
            ManifestError::UnknownDependency {
                dependency: "libs/gone".to_string(),
                component: "app".to_string(),
            },
            ManifestError::Unreadable {
                path: PathBuf::from("broken/Dependencies"),
                message: "permission denied".to_string(),
            },
        ])
        .expect("non-empty");

        assert_eq!(
            err.to_string(),
            "cannot load dependencies:\n\
             unknown dependency 'libs/gone' of 'app'\n\
             cannot read dependency manifest broken/Dependencies: permission denied"
        );
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn scope_error_names_the_component() {
        let err = ScopeError::NotAComponent("nope".to_string());
        assert_eq!(err.to_string(), "cannot scope to 'nope', not a component");
    }
}
