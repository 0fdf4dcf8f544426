//! Command-line layer: argument parsing, dispatch and output.

use anyhow::Result;

pub mod args;
pub mod exit_status;
pub mod report;
pub mod run;

pub use args::{Arguments, Command, OutputFormat};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    crate::logging::init(args.verbose());

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let output = run::run(args)?;
    report::print(&output)?;

    Ok(ExitStatus::Success)
}
