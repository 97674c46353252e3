//! The ephemeral per-run build environment.
//!
//! Exactly one environment exists per triggered run. It owns the isolated
//! dependency scope (the venv) and the packager's work and output
//! directories, and is discarded when the run ends unless explicitly kept.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::pipeline::{Error, Result};

/// Ephemeral machine state for a single pipeline run.
///
/// Concurrent runs each create their own environment; nothing is shared
/// between them.
#[derive(Debug)]
pub struct BuildEnvironment {
    root: PathBuf,
    // Dropping the guard removes the tree; kept environments have none.
    _guard: Option<TempDir>,
}

impl BuildEnvironment {
    /// Creates a fresh build environment.
    ///
    /// When `keep` is set the directory outlives the run so a failed build
    /// can be inspected; otherwise it is removed on drop.
    pub fn create(keep: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pdfwatcher-dist-")
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;

        if keep {
            let root = dir.keep();
            log::info!("build environment kept at {}", root.display());
            Ok(Self { root, _guard: None })
        } else {
            Ok(Self {
                root: dir.path().to_path_buf(),
                _guard: Some(dir),
            })
        }
    }

    /// Root directory of this environment.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the isolated dependency scope (venv).
    pub fn venv_dir(&self) -> PathBuf {
        self.root.join("venv")
    }

    /// Scratch directory for the packaging tool.
    pub fn work_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Directory the packaging tool emits bundles into.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// Path of a program installed into the venv.
    pub fn venv_program(&self, name: &str) -> PathBuf {
        venv_program(&self.venv_dir(), name)
    }
}

/// Resolves a program inside a venv, honoring the platform layout.
#[cfg(windows)]
fn venv_program(venv: &Path, name: &str) -> PathBuf {
    venv.join("Scripts").join(format!("{name}.exe"))
}

/// Resolves a program inside a venv, honoring the platform layout.
#[cfg(not(windows))]
fn venv_program(venv: &Path, name: &str) -> PathBuf {
    venv.join("bin").join(name)
}
