//! Dependency installation into an isolated environment.
//!
//! Creates a venv inside the build environment, upgrades the package
//! manager first, installs the requirements manifest, then the extra tool
//! packages (the packaging tool itself). Any non-zero exit halts the run
//! with no retry.

use std::ffi::OsString;
use std::path::Path;

use crate::pipeline::utils::process::run_tool;
use crate::pipeline::{BuildEnvironment, Error, Result, Settings};

/// Installs all dependencies into a fresh venv.
pub async fn run(
    settings: &Settings,
    env: &BuildEnvironment,
    interpreter: &Path,
) -> Result<()> {
    let requirements = settings.requirements();
    if !requirements.is_file() {
        return Err(Error::Installation {
            command: "pip install -r".to_string(),
            reason: format!("requirements manifest {} not found", requirements.display()),
        });
    }

    // Isolated dependency scope, discarded at environment teardown
    let venv = env.venv_dir();
    checked(
        interpreter,
        &[
            OsString::from("-m"),
            OsString::from("venv"),
            venv.clone().into_os_string(),
        ],
        "python -m venv",
    )
    .await?;

    let pip = env.venv_program("pip");

    // Upgrade the package manager before anything else
    checked(
        &pip,
        &[
            OsString::from("install"),
            OsString::from("--upgrade"),
            OsString::from("pip"),
        ],
        "pip install --upgrade pip",
    )
    .await?;

    checked(
        &pip,
        &[
            OsString::from("install"),
            OsString::from("-r"),
            requirements.into_os_string(),
        ],
        "pip install -r",
    )
    .await?;

    let tools = &settings.manifest().install.tools;
    if !tools.is_empty() {
        let mut args = vec![OsString::from("install")];
        args.extend(tools.iter().map(OsString::from));
        checked(&pip, &args, "pip install tools").await?;
    }

    log::info!(
        "installed {} requirement set and {} tool package(s) into {}",
        settings.requirements().display(),
        tools.len(),
        venv.display()
    );
    Ok(())
}

/// Runs one installation command, mapping any failure to the step taxonomy.
async fn checked(program: &Path, args: &[OsString], label: &str) -> Result<()> {
    let output = run_tool(program, args, None)
        .await
        .map_err(|e| Error::Installation {
            command: label.to_string(),
            reason: e.to_string(),
        })?;

    if output.success() {
        Ok(())
    } else {
        Err(Error::Installation {
            command: label.to_string(),
            reason: output.failure_detail(),
        })
    }
}
