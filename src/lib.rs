//! Release pipeline library for packaging the PDFWatcher app.
//!
//! This library provides the building blocks of the packaging pipeline:
//! - Trigger evaluation (tag pushes and manual dispatch)
//! - An ephemeral build environment with a pinned interpreter
//! - Dependency installation into an isolated environment
//! - Invocation of the packaging tool with explicit hidden imports
//! - Publication of the bundle as an immutable named artifact
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod trigger;

// Re-export commonly used types
pub use error::{CliError, DistError, Result};
