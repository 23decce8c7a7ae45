//! Changed-file discovery through git.
//!
//! [`Git`] never spawns processes itself; it hands argument lists to an
//! executor. [`Git::system`] wires in the real `git` binary, tests pass a
//! closure that answers from a script.

use std::process::Command;

use tracing::{debug, instrument};

/// How the diff base is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Diff against the merge base of `HEAD` and `base_branch`.
    Feature { base_branch: String },
    /// Diff against `base_commit` directly.
    Main { base_commit: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GitError {
    #[error("cannot find merge base with branch '{base_branch}': {message}")]
    MergeBase {
        base_branch: String,
        message: String,
    },

    #[error("cannot find changed files: {message}")]
    Diff { message: String },
}

pub struct Git<E> {
    exec: E,
}

impl<E> Git<E>
where
    E: FnMut(&[String]) -> Result<String, String>,
{
    #[must_use]
    pub const fn new(exec: E) -> Self {
        Self { exec }
    }

    /// Files changed relative to the base chosen by `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] when the executor reports a failure.
    #[instrument(skip(self))]
    pub fn changed_files(&mut self, mode: &Mode) -> Result<Vec<String>, GitError> {
        let base = match mode {
            Mode::Feature { base_branch } => self.merge_base(base_branch)?,
            Mode::Main { base_commit } => base_commit.clone(),
        };

        let args = to_args(&["diff", "--no-commit-id", "--name-only", "-r", &base]);
        let listed = (self.exec)(&args).map_err(|message| GitError::Diff { message })?;

        let files: Vec<String> = listed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();

        debug!(base = %base, files = files.len(), "changed files");
        Ok(files)
    }

    fn merge_base(&mut self, base_branch: &str) -> Result<String, GitError> {
        let args = to_args(&["merge-base", base_branch, "HEAD"]);
        let out = (self.exec)(&args).map_err(|message| GitError::MergeBase {
            base_branch: base_branch.to_string(),
            message,
        })?;

        Ok(out.trim().to_string())
    }
}

impl Git<fn(&[String]) -> Result<String, String>> {
    /// A [`Git`] that runs the `git` binary in the current directory.
    #[must_use]
    pub fn system() -> Self {
        Self::new(run_git)
    }
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

fn run_git(args: &[String]) -> Result<String, String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|err| format!("failed to run git: {err}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()));
    }

    String::from_utf8(output.stdout).map_err(|err| format!("invalid UTF-8 output from git: {err}"))
}
