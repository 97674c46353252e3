//! The four pipeline steps, in execution order.
//!
//! Each step module exposes a single async entry point. Steps never recover
//! locally; classification of failures into the run-level taxonomy happens
//! here, and the runner decides nothing beyond "continue or abort".

pub mod install;
pub mod package;
pub mod provision;
pub mod publish;

use serde::{Deserialize, Serialize};

/// Identifies a pipeline step in reports, logs, and timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Locate the pinned interpreter
    Provision,
    /// Create the venv and install dependencies
    Install,
    /// Invoke the packaging tool
    Package,
    /// Upload the bundle to the artifact store
    Publish,
}

impl StepKind {
    /// All steps in execution order.
    pub const ORDER: [StepKind; 4] = [
        StepKind::Provision,
        StepKind::Install,
        StepKind::Package,
        StepKind::Publish,
    ];
}

/// Name of the bundle's launcher executable on this platform.
#[cfg(windows)]
pub(crate) fn launcher_name(name: &str) -> String {
    format!("{name}.exe")
}

/// Name of the bundle's launcher executable on this platform.
#[cfg(not(windows))]
pub(crate) fn launcher_name(name: &str) -> String {
    name.to_string()
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepKind::Provision => "provision",
            StepKind::Install => "install",
            StepKind::Package => "package",
            StepKind::Publish => "publish",
        };
        f.write_str(name)
    }
}
