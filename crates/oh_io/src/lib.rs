//! crates/oh_io/src/lib.rs
//! Filesystem and JSON boundary for the admin tools.
//!
//! - Canonical JSON (sorted keys, compact) with atomic writes
//! - SHA-256 digests and `DRAW:` ids over canonical bytes
//! - Draft 2020-12 schema checks on every loaded document
//! - Size-limited loaders and the job manifest
//!
//! Offline only: any `<scheme>://` path is rejected before it reaches the filesystem.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod manifest;
pub mod schema;

/// Unified error for oh_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Could not read an input (missing file, permissions, stdin).
    #[error("read error: {0}")]
    Read(String),

    /// Path policy or filesystem errors while writing (URL paths, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON syntax or shape errors, with a JSON Pointer when one is known.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema violation (first one reported).
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    #[error("manifest error: {0}")]
    Manifest(String),

    /// A digest pinned in the manifest does not match the input.
    #[error("expectation failed: {0}")]
    Expect(String),

    /// Input exceeds a hard size limit.
    #[error("limit exceeded: {0}")]
    Limit(String),

    #[error("hash error: {0}")]
    Hash(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column, not a pointer.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

/// True if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url(s: &str) -> bool {
    let t = s.trim();
    t.contains("://") || t.starts_with("http:") || t.starts_with("https:")
}
