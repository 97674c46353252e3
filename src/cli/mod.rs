//! Command line interface for the packaging pipeline.
//!
//! Provides argument parsing, command dispatch, and user feedback. Exit
//! codes: 0 on success (including ignored events), 1 on a failed run or
//! error, 2 from `check` when an event would not trigger.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, EventArgs, RunArgs};
pub use output::OutputManager;

use crate::error::{CliError, DistError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate().map_err(|reason| {
        DistError::Cli(CliError::InvalidArguments { reason })
    })?;

    let output = OutputManager::new(args.verbose, args.quiet);

    match &args.command {
        Command::Run(run_args) => commands::run::execute(&args, run_args, &output).await,
        Command::Check(event_args) => commands::check::execute(&args, event_args, &output),
        Command::Validate => commands::validate::execute(&args, &output),
    }
}
