//! Target resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → target.rs (url= / b64url= / path-embedded host form)
//!     → TargetDescriptor (absolute URL, cleaned query)
//!     → relay orchestrator
//! ```
//!
//! # Design Decisions
//! - Resolution failure is not an error; the caller gets a usage page
//! - Control parameters (`url`, `b64url`, `scheme`) never reach the target
//! - Deterministic: same input always resolves the same target
//! - Immutable after construction

pub mod target;

pub use target::{resolve_target, TargetDescriptor};
