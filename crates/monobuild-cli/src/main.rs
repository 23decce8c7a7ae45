#![forbid(unsafe_code)]

mod cmd;
mod discover;
mod git;
mod output;

use std::env;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use monobuild_core::config::{Config, Overrides, resolve_config};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::Input;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "monobuild: build orchestration for Continuous Integration in a monorepo",
    long_about = "Monobuild understands the graph of dependencies in a monorepo, where \
                  separate components live side by side, and decides what should be \
                  built given a set of changes."
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Search pattern for dependency files [default: **/Dependencies].
    #[arg(long, global = true, value_name = "GLOB")]
    dependency_files: Option<String>,

    /// Whole-repository manifest (as produced by `print --full`).
    #[arg(short, long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Print the full build schedule or dependency graph",
        long_about = "Print the build schedule (strong dependencies only) or the \
                      dependency graph for every component.\n\nEach line is \
                      '<component>: <dependency>, <dependency>, ...'.",
        after_help = "EXAMPLES:\n    # Build schedule for the whole repository\n    monobuild print\n\n    # Replayable manifest with strengths\n    monobuild print --full > repo.deps\n\n    # Graph for one component, as GraphViz\n    monobuild print --scope app --dependencies --dot"
    )]
    Print(cmd::print::PrintArgs),

    #[command(
        about = "Build schedule for components affected by git changes",
        long_about = "Create a build schedule from git history and the dependency graph.\n\n\
                      By default changed files are determined from the local git \
                      repository. Add a '-' to read them from stdin instead.",
        after_help = "EXAMPLES:\n    # Changes on this branch since it left master\n    monobuild diff\n\n    # Changes in the last commit on the main branch\n    monobuild diff --main-branch\n\n    # Changed files supplied by CI\n    git diff --name-only HEAD~1 | monobuild diff -\n\n    # GitHub Actions matrix\n    monobuild diff --rebuild-strong --github-matrix"
    )]
    Diff(cmd::diff::DiffArgs),

    #[command(
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells."
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let (base_branch, base_commit) = match &self.command {
            Commands::Diff(args) => (args.base_branch.clone(), args.base_commit.clone()),
            Commands::Print(_) | Commands::Completions(_) => (None, None),
        };

        Overrides {
            dependency_files: self.dependency_files.clone(),
            base_branch,
            base_commit,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("MONOBUILD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "monobuild=debug,monobuild_core=debug,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("MONOBUILD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Resolve configuration and pick the manifest input for `print` and `diff`.
fn prepare(cli: &Cli, project_root: &Path) -> anyhow::Result<(Config, Input)> {
    let config = resolve_config(project_root, cli.overrides())?;

    let input = cli.file.clone().map_or_else(
        || Input::Manifests {
            pattern: config.dependency_files.clone(),
        },
        |path| Input::RepoManifest { path },
    );

    Ok((config, input))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = env::current_dir()?;
    debug!(root = %project_root.display(), "starting");

    match cli.command {
        Commands::Print(ref args) => {
            let (_, input) = prepare(&cli, &project_root)?;
            cmd::print::run_print(args, &input, &project_root)
        }
        Commands::Diff(ref args) => {
            let (config, input) = prepare(&cli, &project_root)?;
            cmd::diff::run_diff(args, &input, &config, &project_root)
        }
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command, &mut std::io::stdout())
        }
    }
}
