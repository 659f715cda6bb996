//! Content file discovery and reads.
//!
//! The aggregator never touches the filesystem directly. It goes through a
//! [`ContentSource`], so tests can count listings and observe in-flight reads.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docsource_shared::{DocSourceError, Result};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Lists and reads content files.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every regular file under `root`, recursively. Order is unspecified.
    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Read one file as UTF-8 text. Invalid sequences become U+FFFD.
    async fn read_to_string(&self, path: &Path) -> Result<String>;
}

// ---------------------------------------------------------------------------
// FsContentSource
// ---------------------------------------------------------------------------

/// [`ContentSource`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsContentSource;

#[async_trait]
impl ContentSource for FsContentSource {
    #[instrument(skip_all, fields(root = %root.display()))]
    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let root = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || walk_files(&root))
            .await
            .map_err(|e| DocSourceError::Task(format!("file listing task failed: {e}")))??;

        debug!(files = files.len(), "listed content files");
        Ok(files)
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DocSourceError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Recursive walk collecting regular files. Symlinks are not followed.
fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            DocSourceError::io(path, source)
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
