//! Archive packaging for one transaction.
//!
//! # Responsibilities
//! - Accumulate named, deflate-compressed entries in a fixed order
//! - Stamp every entry with the transaction's capture instant
//! - Finalize exactly once, yielding the archive bytes for upload
//!
//! # Design Decisions
//! - Stages into a pooled buffer; an abandoned builder returns the buffer
//!   to the pool in `Drop`
//! - Entry names are fixed literals, so there is no collision or
//!   traversal concern inside the archive

use std::io::{Cursor, Write};
use std::sync::Arc;

use time::OffsetDateTime;
use zip::result::ZipError;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

use crate::buffer::{BufferLease, BufferPool};

/// Entry holding the request transcript. Always present.
pub const REQUEST_TRANSCRIPT: &str = "request.txt";
/// Entry holding a binary request body.
pub const REQUEST_BODY: &str = "request.bin";
/// Entry holding the response transcript. Always present.
pub const RESPONSE_TRANSCRIPT: &str = "response.txt";
/// Entry holding a binary response body.
pub const RESPONSE_BODY: &str = "response.bin";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the per-transaction zip archive.
pub struct ArchiveBuilder {
    writer: Option<ZipWriter<Cursor<Vec<u8>>>>,
    options: SimpleFileOptions,
    pool: Arc<BufferPool>,
}

impl ArchiveBuilder {
    /// Start an archive staged in a pooled buffer. Every entry will carry
    /// `captured_at` as its modification time.
    pub fn new(pool: &Arc<BufferPool>, captured_at: OffsetDateTime) -> Self {
        let staging = pool.checkout().detach();
        let stamp = DateTime::try_from(captured_at).unwrap_or_default();
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(stamp);
        Self {
            writer: Some(ZipWriter::new(Cursor::new(staging))),
            options,
            pool: Arc::clone(pool),
        }
    }

    /// Append one named entry.
    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        let writer = self.writer.as_mut().expect("archive already finalized");
        writer.start_file(name, self.options)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    /// Finalize the archive and return its bytes, still pool-leased.
    pub fn finish(mut self) -> Result<BufferLease, ArchiveError> {
        let writer = self.writer.take().expect("archive already finalized");
        let cursor = writer.finish()?;
        Ok(self.pool.wrap(cursor.into_inner()))
    }
}

impl Drop for ArchiveBuilder {
    fn drop(&mut self) {
        // Abandoned mid-transaction (error or cancellation): recover the
        // staging buffer for the pool.
        if let Some(writer) = self.writer.take() {
            if let Ok(cursor) = writer.finish() {
                self.pool.release(cursor.into_inner());
            }
        }
    }
}
