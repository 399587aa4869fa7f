//! Traffic capture subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request / upstream response
//!     → classify.rs (textual or binary body?)
//!     → transcript.rs (request line, headers, inline text body)
//!     → archive.rs (request.txt / request.bin / response.txt / response.bin)
//!     → finalized zip bytes, ready for upload
//! ```
//!
//! # Design Decisions
//! - Transcripts are fully built before being frozen into the archive
//! - Entry order is fixed; the archive is finalized exactly once
//! - All staging goes through the pooled buffer allocator

pub mod archive;
pub mod classify;
pub mod transcript;

pub use archive::{ArchiveBuilder, ArchiveError};
pub use classify::is_textual;
pub use transcript::Transcript;
