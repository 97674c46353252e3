//! Pipeline manifest loading from a single dist.toml.
//!
//! The manifest is the whole declarative surface of the pipeline: what to
//! package, which interpreter version to pin, what to install, how to bundle,
//! and which tags trigger a run. It is read and parsed exactly once.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{CliError, DistError, Result};
use crate::trigger::DEFAULT_TAG_PATTERN;

/// How the packaged application's runtime files are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleMode {
    /// One directory tree containing the launcher and its runtime files.
    OneDir,
    /// One self-extracting file.
    OneFile,
}

impl BundleMode {
    /// The packaging tool flag for this mode.
    pub fn flag(&self) -> &'static str {
        match self {
            BundleMode::OneDir => "--onedir",
            BundleMode::OneFile => "--onefile",
        }
    }
}

/// Whether the produced launcher opens a console window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherMode {
    /// GUI launcher, no console window.
    Windowed,
    /// Console launcher.
    Console,
}

impl LauncherMode {
    /// The packaging tool flag for this mode.
    pub fn flag(&self) -> &'static str {
        match self {
            LauncherMode::Windowed => "--windowed",
            LauncherMode::Console => "--console",
        }
    }
}

/// `[package]` section: what gets packaged.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageSection {
    /// Output name of the bundle and its launcher (e.g. "PDFWatcher")
    pub name: String,
    /// Entry-point script path, relative to the project root
    pub entry_script: PathBuf,
}

/// `[python]` section: interpreter pinning.
#[derive(Debug, Clone, Deserialize)]
pub struct PythonSection {
    /// Pinned interpreter version prefix (e.g. "3.11")
    pub version: String,
}

/// `[install]` section: dependency installation.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallSection {
    /// Requirements manifest path, relative to the project root
    pub requirements: PathBuf,
    /// Extra tool packages installed after the requirements (the packaging
    /// tool itself lives here)
    #[serde(default = "default_tools")]
    pub tools: Vec<String>,
}

fn default_tools() -> Vec<String> {
    vec!["pyinstaller".to_string()]
}

/// `[bundle]` section: packaging tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
    /// Bundling mode
    #[serde(default = "default_bundle_mode")]
    pub mode: BundleMode,
    /// Launcher mode
    #[serde(default = "default_launcher_mode")]
    pub launcher: LauncherMode,
    /// Modules the packaging tool's static analysis would miss.
    ///
    /// These are passed explicitly; omitting a required one does not fail
    /// the build, it surfaces as an import failure when the produced binary
    /// runs.
    #[serde(default)]
    pub hidden_imports: Vec<String>,
}

fn default_bundle_mode() -> BundleMode {
    BundleMode::OneDir
}

fn default_launcher_mode() -> LauncherMode {
    LauncherMode::Windowed
}

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            mode: default_bundle_mode(),
            launcher: default_launcher_mode(),
            hidden_imports: Vec::new(),
        }
    }
}

/// `[artifact]` section: published output naming.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSection {
    /// Logical artifact name (e.g. "windows-dist")
    pub name: String,
}

/// `[trigger]` section: which events start a run.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerSection {
    /// Tag glob patterns; a pushed tag matching any of them triggers a run
    #[serde(default = "default_tag_patterns")]
    pub tags: Vec<String>,
}

fn default_tag_patterns() -> Vec<String> {
    vec![DEFAULT_TAG_PATTERN.to_string()]
}

impl Default for TriggerSection {
    fn default() -> Self {
        Self {
            tags: default_tag_patterns(),
        }
    }
}

/// Complete pipeline manifest from dist.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// What gets packaged
    pub package: PackageSection,
    /// Interpreter pinning
    pub python: PythonSection,
    /// Dependency installation
    pub install: InstallSection,
    /// Packaging tool configuration
    #[serde(default)]
    pub bundle: BundleSection,
    /// Published output naming
    pub artifact: ArtifactSection,
    /// Which events start a run
    #[serde(default)]
    pub trigger: TriggerSection,
}

impl Manifest {
    /// Load and validate a manifest from a dist.toml path.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DistError::Cli(CliError::ExecutionFailed {
                command: "read_manifest".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;

        let manifest: Manifest = toml::from_str(&raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from an in-memory TOML string.
    pub fn parse(raw: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(raw)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate field-level constraints the TOML schema cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.package.name.trim().is_empty() {
            return Err(invalid("package.name must not be empty"));
        }
        if self.package.entry_script.as_os_str().is_empty() {
            return Err(invalid("package.entry_script must not be empty"));
        }
        if self.python.version.trim().is_empty() {
            return Err(invalid("python.version must not be empty"));
        }
        // Every dot-separated component must be non-empty and numeric, so
        // "3." or "3..11" cannot leak into interpreter probing
        if !self
            .python
            .version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(invalid(
                "python.version must be a dotted numeric version (e.g. \"3.11\")",
            ));
        }
        if self.artifact.name.trim().is_empty() {
            return Err(invalid("artifact.name must not be empty"));
        }
        // Artifact names become store directory names
        if self
            .artifact
            .name
            .contains(|c| c == '/' || c == '\\' || c == ':')
        {
            return Err(invalid("artifact.name must not contain path separators"));
        }
        if self.trigger.tags.is_empty() {
            return Err(invalid("trigger.tags must list at least one pattern"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> DistError {
    DistError::Cli(CliError::InvalidArguments {
        reason: reason.to_string(),
    })
}
