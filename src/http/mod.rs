//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, capture handler)
//!     → routing::target (resolve outbound target)
//!     → capture:: (transcripts, classification, archive)
//!     → storage:: (naming, container, upload)
//!     → response.rs (captured response / usage page / errors)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{CapturedResponse, RelayError};
pub use server::{AppState, HttpServer};
