//! The `validate` subcommand: check the manifest, run nothing.

use crate::cli::{Args, OutputManager};
use crate::error::Result;
use crate::manifest::Manifest;

/// Parses and validates the manifest, printing a summary.
pub fn execute(args: &Args, output: &OutputManager) -> Result<i32> {
    let manifest = Manifest::load(&args.manifest)?;

    output.success(&format!("{} is valid", args.manifest.display()))?;
    output.indent(&format!(
        "package: {} ({})",
        manifest.package.name,
        manifest.package.entry_script.display()
    ))?;
    output.indent(&format!("python: {}", manifest.python.version))?;
    output.indent(&format!(
        "install: {} + {} tool package(s)",
        manifest.install.requirements.display(),
        manifest.install.tools.len()
    ))?;
    output.indent(&format!(
        "bundle: {:?}/{:?}, {} hidden import(s)",
        manifest.bundle.mode,
        manifest.bundle.launcher,
        manifest.bundle.hidden_imports.len()
    ))?;
    output.indent(&format!("artifact: {}", manifest.artifact.name))?;
    output.indent(&format!("triggers: tags [{}]", manifest.trigger.tags.join(", ")))?;

    Ok(0)
}
