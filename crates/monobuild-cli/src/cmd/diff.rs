//! `monobuild diff`: build what a change impacts.
//!
//! Changed files come from git (feature-branch or main-branch mode) or, with
//! a `-` argument, one path per line on stdin.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use monobuild_core::config::Config;
use tracing::{debug, info};

use crate::cmd::{Input, OutputArgs, emit, load_project};
use crate::git::{Git, Mode};
use crate::output::Format;

/// Arguments for `monobuild diff`.
#[derive(Args, Debug, Default)]
pub struct DiffArgs {
    /// Read changed files from stdin instead of git.
    #[arg(value_name = "-", value_parser = ["-"])]
    pub stdin: Option<String>,

    /// Base branch to use for comparison [default: master].
    #[arg(long)]
    pub base_branch: Option<String>,

    /// Base commit to compare with in main-branch mode [default: HEAD^1].
    #[arg(long)]
    pub base_commit: Option<String>,

    /// Run in main branch mode (compare with the base commit only).
    #[arg(long)]
    pub main_branch: bool,

    /// Include all strong dependencies of affected components.
    #[arg(long)]
    pub rebuild_strong: bool,

    /// Output a JSON list usable as a GitHub Actions build matrix.
    #[arg(long)]
    pub github_matrix: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Where changed files are taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Git(Mode),
}

impl DiffArgs {
    #[must_use]
    pub fn source(&self, config: &Config) -> Source {
        if self.stdin.is_some() {
            Source::Stdin
        } else if self.main_branch {
            Source::Git(Mode::Main {
                base_commit: config.base_commit.clone(),
            })
        } else {
            Source::Git(Mode::Feature {
                base_branch: config.base_branch.clone(),
            })
        }
    }
}

/// Print the schedule or graph for components impacted by a change.
///
/// # Errors
///
/// Fails if manifests cannot be loaded, changed files cannot be determined,
/// or the scope is not a component.
pub fn run_diff(args: &DiffArgs, input: &Input, config: &Config, project_root: &Path) -> Result<()> {
    let project = load_project(project_root, input)?;

    let changed = match args.source(config) {
        Source::Stdin => read_changed_files(std::io::stdin().lock())?,
        Source::Git(mode) => Git::system()
            .changed_files(&mode)
            .context("cannot find changes")?,
    };
    info!(changed_files = changed.len(), "diffing");

    let plan = project.diff_plan(&changed, &args.output.scope(), args.rebuild_strong)?;
    debug!(selected = plan.selection.len(), "planned build");

    emit(&plan, Format::from_flags(&args.output, args.github_matrix))
}

/// One path per line; surrounding whitespace and blank lines are dropped.
///
/// # Errors
///
/// Fails if `input` cannot be read or is not UTF-8.
pub fn read_changed_files(input: impl BufRead) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for line in input.lines() {
        let line = line.context("Failed to read changed files from stdin")?;
        let path = line.trim();
        if !path.is_empty() {
            files.push(path.to_string());
        }
    }
    Ok(files)
}
