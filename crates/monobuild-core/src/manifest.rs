//! Dependency manifests: parsing, validation and conversion to a [`Graph`].
//!
//! # Formats
//!
//! **Per-component manifest.** One file per component directory, one
//! dependency per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! libs/common
//! !services/schema
//! ```
//!
//! A plain name is a weak dependency, a `!` prefix makes it strong. Names
//! are trimmed and a trailing `/` is dropped. The component is the
//! directory holding the manifest.
//!
//! **Whole-repository manifest.** A single text with one line per component,
//! as written by `print --full`:
//!
//! ```text
//! app: libs/common, !services/schema
//! libs/common:
//! services/schema:
//! ```
//!
//! # Validation
//!
//! Every declared dependency must name a known component. Problems are
//! collected across all sources and returned together in
//! [`ReadOutcome::errors`]; [`ReadOutcome::into_result`] turns a non-empty
//! list into a [`LoadError`] so an invalid graph cannot reach diffing.

use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{LoadError, ManifestError};
use crate::graph::{Edge, Graph, Kind};

// ---------------------------------------------------------------------------
// Dependency / Dependencies
// ---------------------------------------------------------------------------

/// One declared dependency of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub name: String,
    pub kind: Kind,
}

impl Dependency {
    #[must_use]
    pub fn weak(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Weak,
        }
    }

    #[must_use]
    pub fn strong(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Kind::Strong,
        }
    }
}

/// Declared dependencies per component, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    deps: BTreeMap<String, Vec<Dependency>>,
}

impl Dependencies {
    /// Dependencies declared by `component`, if it was declared at all.
    #[must_use]
    pub fn get(&self, component: &str) -> Option<&[Dependency]> {
        self.deps.get(component).map(Vec::as_slice)
    }

    /// Number of declaring components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Materialize the declarations as a normalized [`Graph`].
    #[must_use]
    pub fn as_graph(&self) -> Graph {
        Graph::new(self.deps.iter().map(|(component, deps)| {
            let edges: Vec<Edge> = deps
                .iter()
                .map(|dep| Edge::new(dep.name.clone(), dep.kind))
                .collect();
            (component.clone(), edges)
        }))
    }

    fn insert(&mut self, component: String, deps: Vec<Dependency>) {
        self.deps.insert(component, deps);
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Dependency>)> {
        self.deps.iter()
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A per-component manifest as handed over by the file-system layer.
#[derive(Debug)]
pub struct ManifestSource {
    /// Path of the manifest file, used in error messages.
    pub path: PathBuf,
    /// Component the manifest describes.
    pub component: String,
    /// File contents, or the error hit while reading them.
    pub content: io::Result<String>,
}

impl ManifestSource {
    /// Build a source whose component is the directory containing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: io::Result<String>) -> Self {
        let path = path.into();
        let component = component_of(&path);
        Self {
            path,
            component,
            content,
        }
    }
}

/// The repository-relative directory holding `manifest`, `/`-separated,
/// without a leading `./` or a trailing separator.
#[must_use]
pub fn component_of(manifest: &Path) -> String {
    manifest
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|part| match part {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Read outcome
// ---------------------------------------------------------------------------

/// Everything one read produced: parsed data plus accumulated errors.
///
/// When `errors` is non-empty the data is partial and must not be used for
/// impact computation. Use [`ReadOutcome::into_result`].
#[derive(Debug, Default)]
pub struct ReadOutcome {
    pub components: Vec<String>,
    pub dependencies: Dependencies,
    pub errors: Vec<ManifestError>,
}

impl ReadOutcome {
    /// Components and dependencies, or every error found.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] listing every problem if any was found.
    pub fn into_result(self) -> Result<(Vec<String>, Dependencies), LoadError> {
        match LoadError::from_errors(self.errors) {
            Some(err) => Err(err),
            None => Ok((self.components, self.dependencies)),
        }
    }

    fn declare(&mut self, component: String, mut deps: Vec<Dependency>, self_dependency: bool) {
        if self.dependencies.get(&component).is_some() {
            self.errors
                .push(ManifestError::DuplicateComponent { component });
            return;
        }

        if self_dependency {
            deps.insert(0, Dependency::weak(component.clone()));
        }

        self.components.push(component.clone());
        self.dependencies.insert(component, deps);
    }

    /// Flag every dependency on a name that is not a declared component.
    fn validate(&mut self) {
        let known: HashSet<&str> = self.components.iter().map(String::as_str).collect();

        let mut unknown = Vec::new();
        for (component, deps) in self.dependencies.iter() {
            for dep in deps {
                if !known.contains(dep.name.as_str()) {
                    unknown.push(ManifestError::UnknownDependency {
                        dependency: dep.name.clone(),
                        component: component.clone(),
                    });
                }
            }
        }

        self.errors.extend(unknown);
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

enum Token {
    Dependency(Dependency),
    Malformed,
}

/// Parse one non-blank dependency token (`name` or `!name`).
///
/// Names may contain spaces unless `allow_spaces` is false.
fn parse_token(raw: &str, allow_spaces: bool) -> Token {
    let token = raw.trim().trim_end_matches('/');

    let (name, kind) = match token.strip_prefix('!') {
        Some(rest) => (rest.trim(), Kind::Strong),
        None => (token, Kind::Weak),
    };

    if name.is_empty() || (!allow_spaces && name.chars().any(char::is_whitespace)) {
        return Token::Malformed;
    }

    Token::Dependency(Dependency {
        name: name.to_string(),
        kind,
    })
}

/// Parse the text of a per-component manifest.
///
/// Returns the dependencies in declaration order, plus one error per
/// malformed line.
#[must_use]
pub fn parse_manifest(component: &str, text: &str) -> (Vec<Dependency>, Vec<ManifestError>) {
    let mut deps = Vec::new();
    let mut errors = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_token(line, true) {
            Token::Dependency(dep) => deps.push(dep),
            Token::Malformed => errors.push(ManifestError::MalformedDependency {
                component: component.to_string(),
                token: line.to_string(),
            }),
        }
    }

    (deps, errors)
}

/// Read per-component manifests and validate them.
///
/// With `self_dependency`, every component also gets a weak dependency on
/// itself, placed first.
#[must_use]
#[instrument(skip(sources))]
pub fn read_manifests(
    sources: impl IntoIterator<Item = ManifestSource>,
    self_dependency: bool,
) -> ReadOutcome {
    let mut outcome = ReadOutcome::default();

    for source in sources {
        let text = match source.content {
            Ok(text) => text,
            Err(err) => {
                outcome.errors.push(ManifestError::Unreadable {
                    path: source.path,
                    message: err.to_string(),
                });
                continue;
            }
        };

        let (deps, errors) = parse_manifest(&source.component, &text);
        outcome.errors.extend(errors);
        outcome.declare(source.component, deps, self_dependency);
    }

    outcome.validate();

    debug!(
        components = outcome.components.len(),
        errors = outcome.errors.len(),
        "read component manifests"
    );

    outcome
}

/// Read and validate a whole-repository manifest.
///
/// Each non-blank, non-comment line must contain exactly one `:`. Bad lines
/// and malformed tokens are reported with 1-based line numbers and skipped.
#[must_use]
#[instrument(skip(manifest))]
pub fn read_repo_manifest(manifest: &str, self_dependency: bool) -> ReadOutcome {
    let mut outcome = ReadOutcome::default();

    for (index, raw) in manifest.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split(':').collect();
        let [component, deps] = parts.as_slice() else {
            outcome.errors.push(ManifestError::BadLineFormat {
                line_number: index + 1,
                line: line.to_string(),
            });
            continue;
        };

        let component = component.trim().trim_end_matches('/');
        if component.is_empty() {
            outcome.errors.push(ManifestError::BadLineFormat {
                line_number: index + 1,
                line: line.to_string(),
            });
            continue;
        }

        let mut dependencies = Vec::new();
        for token in deps.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match parse_token(token, false) {
                Token::Dependency(dep) => dependencies.push(dep),
                Token::Malformed => outcome.errors.push(ManifestError::MalformedDependency {
                    component: component.to_string(),
                    token: token.to_string(),
                }),
            }
        }

        outcome.declare(component.to_string(), dependencies, self_dependency);
    }

    outcome.validate();

    debug!(
        components = outcome.components.len(),
        errors = outcome.errors.len(),
        "read repository manifest"
    );

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
