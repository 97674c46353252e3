//! Builder for constructing Settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use super::core::{Settings, DEFAULT_STEP_TIMEOUT};
use crate::manifest::Manifest;

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for resolving a manifest into run configuration.
///
/// # Examples
///
/// ```no_run
/// use pdfwatcher_dist::manifest::Manifest;
/// use pdfwatcher_dist::pipeline::SettingsBuilder;
///
/// # fn example(manifest: Manifest) -> pdfwatcher_dist::Result<()> {
/// let settings = SettingsBuilder::new()
///     .manifest(manifest)
///     .project_root(".")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    manifest: Option<Manifest>,
    project_root: Option<PathBuf>,
    store_dir: Option<PathBuf>,
    step_timeout: Option<Duration>,
    interpreter_candidates: Option<Vec<String>>,
    packager_program: Option<PathBuf>,
    keep_env: bool,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the pipeline manifest.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Sets the project root the manifest paths resolve against.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact store root.
    ///
    /// Default: `<platform data dir>/pdfwatcher-dist/artifacts`
    pub fn store_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the per-step wall-clock timeout.
    ///
    /// Default: [`DEFAULT_STEP_TIMEOUT`] (15 minutes)
    pub fn step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }

    /// Overrides the interpreter program names probed by the provisioner.
    ///
    /// Default: derived from the pinned version (`python3.11`, `python3`, …)
    pub fn interpreter_candidates(mut self, candidates: Vec<String>) -> Self {
        self.interpreter_candidates = Some(candidates);
        self
    }

    /// Overrides the packager program instead of the venv-installed one.
    ///
    /// Default: None (use the packaging tool installed into the venv)
    pub fn packager_program<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.packager_program = Some(program.as_ref().to_path_buf());
        self
    }

    /// Preserves the build environment after the run for inspection.
    ///
    /// Default: false (ephemeral, destroyed at run end)
    pub fn keep_env(mut self, keep: bool) -> Self {
        self.keep_env = keep;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `manifest`
    /// - `project_root`
    pub fn build(self) -> crate::error::Result<Settings> {
        let store_dir = match self.store_dir {
            Some(dir) => dir,
            None => default_store_dir(),
        };

        Ok(Settings::new(
            self.manifest.context("manifest is required")?,
            self.project_root.context("project_root is required")?,
            store_dir,
            self.step_timeout.unwrap_or(DEFAULT_STEP_TIMEOUT),
            self.interpreter_candidates,
            self.packager_program,
            self.keep_env,
        ))
    }
}

/// Default artifact store under the platform data directory.
fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pdfwatcher-dist")
        .join("artifacts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_is_an_error() {
        let result = SettingsBuilder::new().project_root(".").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_project_root_is_an_error() {
        let manifest = Manifest::parse(
            r#"
            [package]
            name = "App"
            entry_script = "app.py"

            [python]
            version = "3.12"

            [install]
            requirements = "requirements.txt"

            [artifact]
            name = "dist"
        "#,
        )
        .unwrap();
        let result = SettingsBuilder::new().manifest(manifest).build();
        assert!(result.is_err());
    }
}
