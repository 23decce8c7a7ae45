pub mod completions;
pub mod diff;
pub mod print;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use monobuild_core::manifest::{read_manifests, read_repo_manifest};
use monobuild_core::{Plan, Project, Scope};
use tracing::debug;

use crate::discover::manifest_sources;
use crate::output::{Format, render};

/// Output flags shared by `print` and `diff`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputArgs {
    /// Output the dependencies, not the build schedule.
    #[arg(long)]
    pub dependencies: bool,

    /// Print in DOT format for GraphViz.
    #[arg(long)]
    pub dot: bool,

    /// Print the full dependency graph including strengths.
    #[arg(long)]
    pub full: bool,

    /// Scope output to a single component and its dependencies.
    #[arg(long, value_name = "COMPONENT")]
    pub scope: Option<String>,

    /// Only list top-level components that nothing depends on.
    #[arg(long)]
    pub top_level: bool,
}

impl OutputArgs {
    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope {
            component: self.scope.clone(),
            top_level: self.top_level,
        }
    }
}

/// Where the dependency graph comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Per-component manifests matching a glob under the project root.
    Manifests { pattern: String },
    /// One whole-repository manifest, as written by `print --full`.
    RepoManifest { path: PathBuf },
}

/// Read and validate the project at `root`.
///
/// # Errors
///
/// Fails if manifests cannot be found or read, or if they do not form a
/// valid dependency graph. Every manifest problem is listed.
pub fn load_project(root: &Path, input: &Input) -> Result<Project> {
    let outcome = match input {
        Input::Manifests { pattern } => {
            let sources = manifest_sources(root, pattern)?;
            read_manifests(sources, false)
        }
        Input::RepoManifest { path } => {
            let text = std::fs::read_to_string(root.join(path))
                .with_context(|| format!("Failed to read {}", path.display()))?;
            read_repo_manifest(&text, false)
        }
    };

    let project = Project::load(outcome)?;
    debug!(components = project.components().len(), "loaded project");
    Ok(project)
}

/// Write `plan` to stdout.
///
/// # Errors
///
/// Fails if stdout is closed.
pub fn emit(plan: &Plan, format: Format) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(plan, format, &mut out).context("Failed to write output")?;
    out.flush().context("Failed to write output")
}
