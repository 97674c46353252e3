//! Packaging: turn the entry script into a distributable bundle.
//!
//! Invokes the packaging tool with the configured bundling and launcher
//! modes plus one `--hidden-import` per configured module. Hidden imports
//! exist because the tool's static dependency discovery misses dynamically
//! loaded modules; omitting a required one does not fail this step, it
//! surfaces as an import error when an end user runs the produced binary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::launcher_name;
use crate::manifest::BundleMode;
use crate::pipeline::utils::process::run_tool;
use crate::pipeline::{BuildEnvironment, Error, Result, Settings};

/// Runs the packaging tool and returns the produced bundle directory.
pub async fn run(settings: &Settings, env: &BuildEnvironment) -> Result<PathBuf> {
    let entry_script = settings.entry_script();
    if !entry_script.is_file() {
        return Err(Error::Packaging {
            reason: format!("entry script {} not found", entry_script.display()),
        });
    }

    let packager = match settings.packager_program() {
        Some(program) => program.to_path_buf(),
        None => env.venv_program("pyinstaller"),
    };

    let args = packager_args(settings, env, &entry_script);
    let output = run_tool(&packager, &args, Some(settings.project_root()))
        .await
        .map_err(|e| Error::Packaging {
            reason: format!("failed to run {}: {}", packager.display(), e),
        })?;

    if !output.success() {
        return Err(Error::Packaging {
            reason: output.failure_detail(),
        });
    }

    let bundle = verify_bundle(settings, &env.dist_dir())?;
    log::info!("packaged bundle at {}", bundle.display());
    Ok(bundle)
}

/// Builds the packaging tool argument list.
fn packager_args(settings: &Settings, env: &BuildEnvironment, entry_script: &Path) -> Vec<OsString> {
    let manifest = settings.manifest();
    let mut args: Vec<OsString> = vec![
        "--noconfirm".into(),
        "--name".into(),
        settings.output_name().into(),
        manifest.bundle.mode.flag().into(),
        manifest.bundle.launcher.flag().into(),
        "--distpath".into(),
        env.dist_dir().into_os_string(),
        "--workpath".into(),
        env.work_dir().into_os_string(),
        "--specpath".into(),
        env.root().to_path_buf().into_os_string(),
    ];
    for module in &manifest.bundle.hidden_imports {
        args.push("--hidden-import".into());
        args.push(module.into());
    }
    args.push(entry_script.to_path_buf().into_os_string());
    args
}

/// Verifies the tool produced what the configuration promised.
///
/// For a single-directory bundle, the dist directory must contain a
/// directory named after the output name holding an executable of the same
/// name; for a single-file bundle, the executable sits in dist directly.
fn verify_bundle(settings: &Settings, dist_dir: &Path) -> Result<PathBuf> {
    let name = settings.output_name();
    match settings.manifest().bundle.mode {
        BundleMode::OneDir => {
            let bundle = dist_dir.join(name);
            if !bundle.is_dir() {
                return Err(Error::Packaging {
                    reason: format!("expected bundle directory {} was not produced", bundle.display()),
                });
            }
            let launcher = bundle.join(launcher_name(name));
            if !launcher.is_file() {
                return Err(Error::Packaging {
                    reason: format!("bundle is missing its launcher {}", launcher.display()),
                });
            }
            Ok(bundle)
        }
        BundleMode::OneFile => {
            let launcher = dist_dir.join(launcher_name(name));
            if !launcher.is_file() {
                return Err(Error::Packaging {
                    reason: format!("expected launcher {} was not produced", launcher.display()),
                });
            }
            Ok(dist_dir.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::pipeline::SettingsBuilder;

    fn settings() -> Settings {
        let manifest = Manifest::parse(
            r#"
            [package]
            name = "PDFWatcher"
            entry_script = "pdfwatcherapp1.py"

            [python]
            version = "3.11"

            [install]
            requirements = "requirements.txt"

            [bundle]
            mode = "onedir"
            launcher = "windowed"
            hidden_imports = ["jaraco.text", "autocommand"]

            [artifact]
            name = "windows-dist"
        "#,
        )
        .unwrap();
        SettingsBuilder::new()
            .manifest(manifest)
            .project_root("/proj")
            .store_dir("/store")
            .build()
            .unwrap()
    }

    #[test]
    fn argument_list_carries_modes_and_hidden_imports() {
        let settings = settings();
        let env = BuildEnvironment::create(false).unwrap();
        let entry = settings.entry_script();
        let args = packager_args(&settings, &env, &entry);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert!(args.contains(&"--noconfirm".to_string()));
        assert!(args.contains(&"--onedir".to_string()));
        assert!(args.contains(&"--windowed".to_string()));

        let name_pos = args.iter().position(|a| a == "--name").unwrap();
        assert_eq!(args[name_pos + 1], "PDFWatcher");

        let hidden: Vec<&String> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "--hidden-import")
            .map(|(i, _)| &args[i + 1])
            .collect();
        assert_eq!(hidden, ["jaraco.text", "autocommand"]);

        // Entry script is the final positional argument
        assert!(args.last().unwrap().ends_with("pdfwatcherapp1.py"));
    }

    #[test]
    fn verify_accepts_directory_bundle_with_launcher() {
        let settings = settings();
        let dist = tempfile::tempdir().unwrap();
        let bundle = dist.path().join("PDFWatcher");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join(launcher_name("PDFWatcher")), b"").unwrap();

        let verified = verify_bundle(&settings, dist.path()).unwrap();
        assert_eq!(verified, bundle);
    }

    #[test]
    fn verify_rejects_missing_bundle_directory() {
        let settings = settings();
        let dist = tempfile::tempdir().unwrap();
        assert!(verify_bundle(&settings, dist.path()).is_err());
    }

    #[test]
    fn verify_rejects_bundle_without_launcher() {
        let settings = settings();
        let dist = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dist.path().join("PDFWatcher")).unwrap();
        assert!(verify_bundle(&settings, dist.path()).is_err());
    }
}
