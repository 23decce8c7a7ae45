use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::cmd::{Input, OutputArgs, emit, load_project};
use crate::output::Format;

/// Arguments for `monobuild print`.
#[derive(Args, Debug)]
pub struct PrintArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Print the schedule or graph for every component.
///
/// # Errors
///
/// Fails if manifests cannot be loaded or the scope is not a component.
pub fn run_print(args: &PrintArgs, input: &Input, project_root: &Path) -> Result<()> {
    let project = load_project(project_root, input)?;
    let plan = project.print_plan(&args.output.scope())?;
    emit(&plan, Format::from_flags(&args.output, false))
}
