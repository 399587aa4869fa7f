//! Durable archive storage.
//!
//! # Data Flow
//! ```text
//! finalized archive bytes
//!     → naming.rs (container from authority, object path from target path)
//!     → ArchiveStore::ensure_container (idempotent)
//!     → ArchiveStore::put_archive
//! ```
//!
//! # Design Decisions
//! - The store is a narrow async trait; the relay never sees a concrete
//!   backend
//! - Object paths embed a sub-second timestamp, so overwrite semantics are
//!   irrelevant in practice
//! - Upload failure aborts the transaction (no retry queue)

pub mod fs_store;
pub mod naming;

use async_trait::async_trait;

pub use fs_store::FilesystemStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid object path: {0}")]
    InvalidPath(String),
}

/// Durable object store for transaction archives.
///
/// Two operations, matching what the relay needs: idempotent container
/// creation and a single object upload.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Create the container if it does not already exist.
    async fn ensure_container(&self, container: &str) -> Result<(), StorageError>;

    /// Write one archive under `container` at `path`.
    async fn put_archive(
        &self,
        container: &str,
        path: &str,
        bytes: &[u8],
    ) -> Result<(), StorageError>;
}
