//! The resolved settings struct.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::manifest::Manifest;

/// Default wall-clock timeout per pipeline step.
///
/// The pipeline itself has no suspension points; every step blocks on a
/// subprocess. A step that outlives this budget is killed and the run fails.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(900);

/// Resolved configuration for a pipeline run.
///
/// Built via [`super::SettingsBuilder`]. Immutable once built; every run
/// sharing a `Settings` still gets its own [`crate::pipeline::BuildEnvironment`].
#[derive(Debug, Clone)]
pub struct Settings {
    manifest: Manifest,
    project_root: PathBuf,
    store_dir: PathBuf,
    step_timeout: Duration,
    interpreter_candidates: Option<Vec<String>>,
    packager_program: Option<PathBuf>,
    keep_env: bool,
}

impl Settings {
    pub(super) fn new(
        manifest: Manifest,
        project_root: PathBuf,
        store_dir: PathBuf,
        step_timeout: Duration,
        interpreter_candidates: Option<Vec<String>>,
        packager_program: Option<PathBuf>,
        keep_env: bool,
    ) -> Self {
        Self {
            manifest,
            project_root,
            store_dir,
            step_timeout,
            interpreter_candidates,
            packager_program,
            keep_env,
        }
    }

    /// The pipeline manifest this run executes.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Root directory of the project being packaged.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Root of the artifact store.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Wall-clock budget for each step; expiry is fatal to the run.
    pub fn step_timeout(&self) -> Duration {
        self.step_timeout
    }

    /// Whether the build environment is preserved after the run.
    pub fn keep_env(&self) -> bool {
        self.keep_env
    }

    /// Entry script path resolved against the project root.
    pub fn entry_script(&self) -> PathBuf {
        self.project_root.join(&self.manifest.package.entry_script)
    }

    /// Requirements manifest path resolved against the project root.
    pub fn requirements(&self) -> PathBuf {
        self.project_root.join(&self.manifest.install.requirements)
    }

    /// Output name of the bundle and its launcher.
    pub fn output_name(&self) -> &str {
        &self.manifest.package.name
    }

    /// Interpreter program names to probe, most specific first.
    ///
    /// Defaults to `python<maj.min>`, `python3`, `python` derived from the
    /// pinned version; tests override this to point at stub executables.
    pub fn interpreter_candidates(&self) -> Vec<String> {
        if let Some(candidates) = &self.interpreter_candidates {
            return candidates.clone();
        }
        let pinned = &self.manifest.python.version;
        let mut candidates = Vec::new();
        // "3.11.4" probes python3.11 first, "3" probes python3
        let minor_pin: String = pinned.split('.').take(2).collect::<Vec<_>>().join(".");
        candidates.push(format!("python{}", minor_pin));
        candidates.push("python3".to_string());
        candidates.push("python".to_string());
        candidates.dedup();
        candidates
    }

    /// Explicit packager program, if the venv-installed one is overridden.
    pub fn packager_program(&self) -> Option<&Path> {
        self.packager_program.as_deref()
    }
}
