//! Per-request scratch space
//!
//! A temporary directory holding the request's upload copies and the
//! downloaded remote result. Created and removed on the blocking pool via
//! [`ScratchDir::create`] and [`ScratchDir::close`]; dropping without
//! closing (e.g. a cancelled request) still removes it, synchronously.

use std::path::{Path, PathBuf};

use kernel::id::ScratchFileId;
use tempfile::TempDir;

use crate::domain::value_objects::ImageExtension;

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub async fn create() -> std::io::Result<Self> {
        let dir = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new().prefix("faceswap_").tempdir()
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(Self { dir })
    }

    /// Remove the directory and everything in it
    pub async fn close(self) {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(dir = %path.display(), error = %e, "Failed to remove scratch directory");
            }
            Err(e) => {
                tracing::warn!(dir = %path.display(), error = %e, "Scratch cleanup worker failed");
            }
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` to `<role>_<id>.<ext>` and return the path
    pub async fn write(
        &self,
        role: &str,
        extension: ImageExtension,
        bytes: &[u8],
    ) -> std::io::Result<PathBuf> {
        let name = format!("{}_{}.{}", role, ScratchFileId::new().simple(), extension);
        let path = self.dir.path().join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}
