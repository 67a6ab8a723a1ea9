//! Template Sync
//!
//! Copies SDK-provided build files into the project. Every operation
//! overwrites unconditionally, so re-running always leaves the latest
//! template in place.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::BuildError;

/// Idempotent file templating operations
pub struct TemplateSync;

impl TemplateSync {
    /// Copy `src` to `dest`, replacing any existing file
    pub async fn copy_file(src: &Path, dest: &Path) -> Result<(), BuildError> {
        ensure_parent(dest).await?;
        tokio::fs::copy(src, dest).await.map_err(|e| template_error(src, e))?;
        debug!("Synced {:?} -> {:?}", src, dest);
        Ok(())
    }

    /// Replace the directory `dest` with a copy of `src`
    pub async fn replace_dir(src: &Path, dest: &Path) -> Result<usize, BuildError> {
        match tokio::fs::remove_dir_all(dest).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(template_error(dest, e)),
        }

        let mut copied = 0;
        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry.map_err(|e| template_error(src, e.into()))?;
            let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                tokio::fs::create_dir_all(&target)
                    .await
                    .map_err(|e| template_error(&target, e))?;
            } else {
                Self::copy_file(entry.path(), &target).await?;
                copied += 1;
            }
        }

        debug!("Replaced {:?} with {} file(s) from {:?}", dest, copied, src);
        Ok(copied)
    }

    /// Write `contents` to `dest`, replacing any existing file
    pub async fn write_file(dest: &Path, contents: &str) -> Result<(), BuildError> {
        ensure_parent(dest).await?;
        tokio::fs::write(dest, contents)
            .await
            .map_err(|e| template_error(dest, e))
    }

    /// Write `contents` to `dest` only when it does not exist yet
    pub async fn write_if_absent(dest: &Path, contents: &str) -> Result<bool, BuildError> {
        if dest.exists() {
            return Ok(false);
        }
        Self::write_file(dest, contents).await?;
        Ok(true)
    }
}

async fn ensure_parent(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| template_error(parent, e)),
        _ => Ok(()),
    }
}

fn template_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Template {
        path: PathBuf::from(path),
        source,
    }
}
