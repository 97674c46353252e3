//! The packaging pipeline: provision → install → package → publish.
//!
//! Control flow is strictly linear. Each step either completes and hands off
//! to the next, or aborts the entire run; there is no retry, no partial
//! success, and no compensating action. A failed run publishes nothing.

mod env;
mod report;
mod runner;
pub mod settings;
pub mod steps;
pub mod utils;

pub use env::BuildEnvironment;
pub use report::{RunOutcome, RunReport, StepReport, StepStatus};
pub use runner::{PipelineRunner, RunResult};
pub use settings::{Settings, SettingsBuilder};
pub use steps::StepKind;

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline step operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for pipeline runs.
///
/// Every variant is fatal to the run that raised it.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested interpreter version unavailable on this machine
    #[error("provisioning failed: {reason}")]
    Provisioning {
        /// What could not be provisioned
        reason: String,
    },

    /// A dependency or tool installation returned non-zero
    #[error("installation failed: {command}: {reason}")]
    Installation {
        /// The installation command that failed
        command: String,
        /// Why it failed
        reason: String,
    },

    /// Entry script missing or the packaging tool errored
    #[error("packaging failed: {reason}")]
    Packaging {
        /// Why packaging failed
        reason: String,
    },

    /// Bundle path missing or the artifact store rejected the upload
    #[error("publish failed: {reason}")]
    Publish {
        /// Why publishing failed
        reason: String,
    },

    /// A step exceeded its wall-clock timeout
    #[error("step {step} timed out after {secs}s")]
    Timeout {
        /// The step that expired
        step: StepKind,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// Filesystem errors around the build environment and store
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path being operated on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Attach a path to a raw IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
