//! Artifact publication into the store.
//!
//! The bundle directory is copied verbatim into
//! `<store>/<artifact-name>/<run-id>/` together with an `artifact.json`
//! receipt. Artifacts are immutable: an occupied run directory is a fatal
//! publish failure, never an overwrite.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::launcher_name;
use crate::pipeline::utils::fs::{copy_dir, dir_stats};
use crate::pipeline::{Error, Result, Settings};

/// Receipt written next to every published artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReceipt {
    /// Logical artifact name
    pub name: String,
    /// Run that produced this artifact
    pub run_id: Uuid,
    /// Publication time
    pub created_at: DateTime<Utc>,
    /// Directory name of the bundle inside the artifact
    pub bundle: String,
    /// Number of files in the bundle
    pub files: u64,
    /// Total bundle size in bytes
    pub bytes: u64,
    /// SHA-256 of the launcher executable, if present
    pub launcher_sha256: Option<String>,
}

/// A published, retrievable artifact.
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    /// Artifact directory in the store
    pub dir: PathBuf,
    /// The written receipt
    pub receipt: ArtifactReceipt,
}

/// Uploads the bundle directory into the artifact store.
pub async fn run(
    settings: &Settings,
    run_id: Uuid,
    bundle_dir: &Path,
) -> Result<PublishedArtifact> {
    if !bundle_dir.is_dir() {
        return Err(Error::Publish {
            reason: format!("bundle directory {} does not exist", bundle_dir.display()),
        });
    }

    let bundle_name = bundle_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Publish {
            reason: format!("bundle path {} has no directory name", bundle_dir.display()),
        })?;

    let artifact_name = &settings.manifest().artifact.name;
    let artifact_dir = settings
        .store_dir()
        .join(artifact_name)
        .join(run_id.to_string());
    if artifact_dir.exists() {
        return Err(Error::Publish {
            reason: format!(
                "artifact directory {} already exists; artifacts are immutable",
                artifact_dir.display()
            ),
        });
    }

    // A failed upload must leave nothing behind in the store
    let receipt = match stage(settings, run_id, bundle_dir, &artifact_dir, bundle_name).await {
        Ok(receipt) => receipt,
        Err(e) => {
            remove_partial_artifact(&artifact_dir).await;
            return Err(e);
        }
    };

    log::info!(
        "published artifact '{}' for run {} ({} files, {} bytes)",
        receipt.name,
        run_id,
        receipt.files,
        receipt.bytes
    );

    Ok(PublishedArtifact {
        dir: artifact_dir,
        receipt,
    })
}

/// Copies the bundle into the artifact directory and writes the receipt.
async fn stage(
    settings: &Settings,
    run_id: Uuid,
    bundle_dir: &Path,
    artifact_dir: &Path,
    bundle_name: String,
) -> Result<ArtifactReceipt> {
    let dest_bundle = artifact_dir.join(&bundle_name);
    copy_dir(bundle_dir, &dest_bundle)
        .await
        .map_err(|e| Error::Publish {
            reason: format!("upload to {} failed: {}", dest_bundle.display(), e),
        })?;

    let stats = dir_stats(&dest_bundle)
        .await
        .map_err(|e| Error::io(dest_bundle.clone(), e))?;

    let launcher = dest_bundle.join(launcher_name(settings.output_name()));
    let launcher_sha256 = if launcher.is_file() {
        Some(sha256_file(&launcher).await?)
    } else {
        None
    };

    let receipt = ArtifactReceipt {
        name: settings.manifest().artifact.name.clone(),
        run_id,
        created_at: Utc::now(),
        bundle: bundle_name,
        files: stats.files,
        bytes: stats.bytes,
        launcher_sha256,
    };

    let receipt_path = artifact_dir.join("artifact.json");
    let json = serde_json::to_string_pretty(&receipt).map_err(|e| Error::Publish {
        reason: format!("failed to serialize receipt: {}", e),
    })?;
    tokio::fs::write(&receipt_path, json)
        .await
        .map_err(|e| Error::io(receipt_path, e))?;

    Ok(receipt)
}

/// Best-effort removal of a partially uploaded artifact directory.
pub(crate) async fn remove_partial_artifact(artifact_dir: &Path) {
    match tokio::fs::remove_dir_all(artifact_dir).await {
        Ok(()) => {
            log::warn!("removed partial artifact at {}", artifact_dir.display());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            log::warn!(
                "failed to remove partial artifact at {}: {}",
                artifact_dir.display(),
                e
            );
        }
    }
}

/// SHA-256 of a file, hex-encoded.
async fn sha256_file(path: &Path) -> Result<String> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(path.to_path_buf(), e))?;
    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::pipeline::SettingsBuilder;

    fn settings(store: &Path) -> Settings {
        let manifest = Manifest::parse(
            r#"
            [package]
            name = "PDFWatcher"
            entry_script = "pdfwatcherapp1.py"

            [python]
            version = "3.11"

            [install]
            requirements = "requirements.txt"

            [artifact]
            name = "windows-dist"
        "#,
        )
        .unwrap();
        SettingsBuilder::new()
            .manifest(manifest)
            .project_root("/proj")
            .store_dir(store)
            .build()
            .unwrap()
    }

    fn make_bundle(root: &Path) -> PathBuf {
        let bundle = root.join("PDFWatcher");
        std::fs::create_dir_all(bundle.join("_internal")).unwrap();
        std::fs::write(bundle.join(launcher_name("PDFWatcher")), b"launcher").unwrap();
        std::fs::write(bundle.join("_internal/runtime.dll"), b"runtime").unwrap();
        bundle
    }

    #[tokio::test]
    async fn publishes_bundle_with_receipt() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let bundle = make_bundle(work.path());
        let settings = settings(store.path());
        let run_id = Uuid::new_v4();

        let published = run(&settings, run_id, &bundle).await.unwrap();

        assert_eq!(
            published.dir,
            store
                .path()
                .join("windows-dist")
                .join(run_id.to_string())
        );
        assert!(published.dir.join("PDFWatcher").is_dir());
        assert!(published
            .dir
            .join("PDFWatcher")
            .join(launcher_name("PDFWatcher"))
            .is_file());
        assert_eq!(published.receipt.files, 2);
        assert!(published.receipt.launcher_sha256.is_some());

        // Receipt round-trips from disk
        let raw = std::fs::read_to_string(published.dir.join("artifact.json")).unwrap();
        let receipt: ArtifactReceipt = serde_json::from_str(&raw).unwrap();
        assert_eq!(receipt.run_id, run_id);
        assert_eq!(receipt.bundle, "PDFWatcher");
    }

    #[tokio::test]
    async fn refuses_to_overwrite_existing_artifact() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let bundle = make_bundle(work.path());
        let settings = settings(store.path());
        let run_id = Uuid::new_v4();

        let first = run(&settings, run_id, &bundle).await.unwrap();
        let second = run(&settings, run_id, &bundle).await;
        assert!(matches!(second, Err(Error::Publish { .. })));

        // The rejected overwrite must not touch the existing artifact
        assert!(first.dir.join("PDFWatcher").is_dir());
        assert!(first.dir.join("artifact.json").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_upload_leaves_no_partial_artifact() {
        let store = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let bundle = make_bundle(work.path());
        // A socket cannot be copied as a regular file, so the upload fails
        // partway through the bundle
        std::os::unix::net::UnixListener::bind(bundle.join("zz.sock")).unwrap();

        let settings = settings(store.path());
        let run_id = Uuid::new_v4();

        let result = run(&settings, run_id, &bundle).await;
        assert!(matches!(result, Err(Error::Publish { .. })));

        // No partial artifact remains in the store
        let artifact_dir = store
            .path()
            .join("windows-dist")
            .join(run_id.to_string());
        assert!(
            !artifact_dir.exists(),
            "failed publish must not leave a run directory behind"
        );
    }

    #[tokio::test]
    async fn missing_bundle_is_a_publish_failure() {
        let store = tempfile::tempdir().unwrap();
        let settings = settings(store.path());
        let result = run(&settings, Uuid::new_v4(), Path::new("/nonexistent")).await;
        assert!(matches!(result, Err(Error::Publish { .. })));
    }
}
