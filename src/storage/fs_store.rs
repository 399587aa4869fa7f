//! Filesystem-backed archive store.
//!
//! Containers are directories under a configured root; objects are files.
//! Directory creation is idempotent, which is exactly the
//! "create container if absent" contract.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{ArchiveStore, StorageError};

/// Archive store rooted at a local directory.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an object path to a filesystem path under the container.
    ///
    /// Object paths derive from caller-supplied target paths, so `..`
    /// components are rejected rather than resolved.
    fn object_file(&self, container: &str, path: &str) -> Result<PathBuf, StorageError> {
        let relative = path.trim_start_matches('/');
        let relative_path = Path::new(relative);
        for component in relative_path.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(StorageError::InvalidPath(path.to_string())),
            }
        }
        Ok(self.root.join(container).join(relative_path))
    }
}

#[async_trait]
impl ArchiveStore for FilesystemStore {
    async fn ensure_container(&self, container: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(self.root.join(container)).await?;
        Ok(())
    }

    async fn put_archive(
        &self,
        container: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        let file = self.object_file(container, path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, bytes).await?;
        tracing::debug!(file = %file.display(), bytes = bytes.len(), "Archive written");
        Ok(())
    }
}
