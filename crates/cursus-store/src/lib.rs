//! Cursus Store - Content Storage Seam
//!
//! Syllabus and proposal content lives in an external content-addressed
//! pinning service; the ledger only carries the resulting references.
//! This crate defines the [`ContentStore`] trait the engine consumes and a
//! reqwest-backed [`PinningClient`] for an HTTP pinning API.
//!
//! Content is opaque end to end: uploads are validated by size and media
//! type only, and nothing here ever inspects payload bytes.

#![forbid(unsafe_code)]

/// Client configuration
pub mod config;

/// The content-store trait
pub mod content_store;

/// Store error type
pub mod errors;

/// HTTP pinning-service client
pub mod pinning;

pub use config::StoreConfig;
pub use content_store::ContentStore;
pub use errors::StoreError;
pub use pinning::{validate_upload, MediaType, PinningClient, MAX_UPLOAD_BYTES};
