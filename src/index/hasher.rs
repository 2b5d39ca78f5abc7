//! Whole-file content fingerprints.
//!
//! A fingerprint is the BLAKE3 digest of every byte in the file, rendered as
//! lowercase hex. Path and modification time never contribute.

use crate::error::{Error, Result};
use crate::index::types::Fingerprint;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Fingerprint the full content of the file at `path`
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let bytes = io::copy(&mut file, &mut hasher).map_err(|e| Error::io(path, e))?;

    let fingerprint = Fingerprint::from_hex(hasher.finalize().to_hex().as_str());
    debug!(path = %path.display(), bytes, %fingerprint, "fingerprinted document");
    Ok(fingerprint)
}

/// Fingerprint an in-memory buffer (same digest as [`fingerprint_file`])
pub fn fingerprint_bytes(content: &[u8]) -> Fingerprint {
    Fingerprint::from_hex(blake3::hash(content).to_hex().as_str())
}
