//! SHA-256 content fingerprints
//!
//! Settings files are fingerprinted in a single canonical format
//! (`sha256:<hex>`) so a repository can tell whether freshly serialized
//! content differs from what it last read or wrote.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content.
///
/// Returns a string in the canonical format `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}
