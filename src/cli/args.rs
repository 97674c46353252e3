//! Command line argument parsing and validation.
//!
//! One binary, three subcommands: `run` executes the pipeline for an event,
//! `check` evaluates an event without running anything, `validate` checks
//! the manifest.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Release pipeline for packaging the PDFWatcher app
#[derive(Parser, Debug)]
#[command(
    name = "pdfwatcher-dist",
    version,
    about = "Packages the PDFWatcher app into a standalone distributable",
    long_about = "Runs the PDFWatcher packaging pipeline: provision a pinned interpreter,
install dependencies into an isolated environment, invoke the packaging tool,
and publish the bundle as an immutable named artifact.

A run starts for a tag push matching the manifest's tag patterns (default v*)
or for a manual dispatch. Any step failure aborts the run; nothing is
published for a failed run.

Usage:
  pdfwatcher-dist run --tag v1.0.0
  pdfwatcher-dist run --manual --store ./artifacts
  pdfwatcher-dist check --tag release-1.0.0
  pdfwatcher-dist validate

Exit code 0 = the requested operation completed (for run: the run succeeded
or the event was ignored)."
)]
pub struct Args {
    /// Path to the pipeline manifest
    #[arg(short = 'm', long, value_name = "PATH", default_value = "dist.toml", global = true)]
    pub manifest: PathBuf,

    /// Print resolved configuration details
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress everything except errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipeline subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an event and, if it triggers, execute a full pipeline run
    Run(RunArgs),
    /// Evaluate an event without running anything
    Check(EventArgs),
    /// Parse and validate the manifest, run nothing
    Validate,
}

/// Event selection shared by `run` and `check`.
#[derive(clap::Args, Debug)]
pub struct EventArgs {
    /// A pushed tag name (e.g. v1.0.0)
    #[arg(long, value_name = "TAG", conflicts_with = "manual")]
    pub tag: Option<String>,

    /// A manual dispatch request (carries no payload)
    #[arg(long)]
    pub manual: bool,
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub event: EventArgs,

    /// Project root the manifest paths resolve against
    ///
    /// Default: the manifest's directory.
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Artifact store root
    ///
    /// Default: the platform data directory.
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Wall-clock timeout per step, in seconds; expiry fails the run
    #[arg(long, value_name = "SECS")]
    pub step_timeout: Option<u64>,

    /// Interpreter program to probe instead of the derived candidates
    ///
    /// May be given multiple times; probed in order.
    #[arg(long = "python", value_name = "PROGRAM")]
    pub python_programs: Vec<String>,

    /// Packager program to invoke instead of the venv-installed one
    #[arg(long, value_name = "PATH")]
    pub packager: Option<PathBuf>,

    /// Keep the build environment after the run for inspection
    #[arg(long)]
    pub keep_env: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Run(run) => run.event.validate(),
            Command::Check(event) => event.validate(),
            Command::Validate => Ok(()),
        }
    }
}

impl EventArgs {
    /// Validate that exactly one event kind was selected.
    pub fn validate(&self) -> Result<(), String> {
        if self.tag.is_none() && !self.manual {
            return Err("specify an event: --tag <TAG> or --manual".to_string());
        }
        Ok(())
    }

    /// The trigger event this selection describes.
    pub fn to_event(&self) -> crate::trigger::TriggerEvent {
        match &self.tag {
            Some(tag) => crate::trigger::TriggerEvent::TagPush { tag: tag.clone() },
            None => crate::trigger::TriggerEvent::ManualDispatch,
        }
    }
}
