use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = ".monobuild.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Glob matched against repository-relative paths to find manifests.
    #[serde(default = "default_dependency_files")]
    pub dependency_files: String,
    /// Branch a feature branch is diffed against.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Commit the main branch is diffed against.
    #[serde(default = "default_base_commit")]
    pub base_commit: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dependency_files: default_dependency_files(),
            base_branch: default_base_branch(),
            base_commit: default_base_commit(),
        }
    }
}

/// Overrides from the command line. `None` keeps the lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub dependency_files: Option<String>,
    pub base_branch: Option<String>,
    pub base_commit: Option<String>,
}

impl Config {
    /// Apply command-line overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            dependency_files: overrides.dependency_files.unwrap_or(self.dependency_files),
            base_branch: overrides.base_branch.unwrap_or(self.base_branch),
            base_commit: overrides.base_commit.unwrap_or(self.base_commit),
        }
    }
}

/// Load `.monobuild.toml` from `project_root`, or defaults when it is absent.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<Config> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Defaults, then `.monobuild.toml` under `project_root`, then `overrides`.
///
/// # Errors
///
/// See [`load_project_config`].
pub fn resolve_config(project_root: &Path, overrides: Overrides) -> Result<Config> {
    let config = load_project_config(project_root)?.with_overrides(overrides);
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn default_dependency_files() -> String {
    "**/Dependencies".to_string()
}

fn default_base_branch() -> String {
    "master".to_string()
}

fn default_base_commit() -> String {
    "HEAD^1".to_string()
}
