//! File system helpers for bundle publication.

use std::io;
use std::path::{Path, PathBuf};

/// Summary of a directory tree: regular file count and total byte size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirStats {
    /// Number of regular files
    pub files: u64,
    /// Total size of regular files in bytes
    pub bytes: u64,
}

/// Recursively copies a directory, creating destination parents as needed.
///
/// Preserves symlinks on platforms that support them. Fails if the source
/// is not a directory.
pub async fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    if !from.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", from.display()),
        ));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    // Blocking traversal belongs on the blocking pool
    tokio::task::spawn_blocking(move || copy_dir_blocking(&from, &to))
        .await
        .map_err(|e| io::Error::other(format!("directory copy task panicked: {e}")))?
}

fn copy_dir_blocking(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        let rel_path = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let dest_path = to.join(rel_path);

        if entry.path_is_symlink() {
            let target = std::fs::read_link(entry.path())?;
            symlink(&target, &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn symlink(target: &Path, dest: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, dest)
    } else {
        std::os::windows::fs::symlink_file(target, dest)
    }
}

/// Walks a directory and sums its regular files.
pub async fn dir_stats(path: &Path) -> io::Result<DirStats> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut stats = DirStats { files: 0, bytes: 0 };
        for entry in walkdir::WalkDir::new(&path) {
            let entry = entry?;
            if entry.file_type().is_file() {
                stats.files += 1;
                stats.bytes += entry.metadata()?.len();
            }
        }
        Ok(stats)
    })
    .await
    .map_err(|e| io::Error::other(format!("directory walk task panicked: {e}")))?
}
