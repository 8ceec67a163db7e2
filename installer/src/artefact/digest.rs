//! SHA-256 computation and comparison for fetched archives.

use crate::manifest::sha256_digest::Sha256Digest;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks and returns the lowercase hex
/// digest as a validated [`Sha256Digest`].
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> std::io::Result<Sha256Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(Sha256Digest::from_bytes(hasher.finalize().into()))
}

/// Result of comparing a fetched archive against its expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The digest matched.
    Verified(Sha256Digest),
    /// The digest differed; nothing downstream may use the file.
    Mismatch {
        /// Digest recorded in the manifest.
        expected: Sha256Digest,
        /// Digest of the bytes actually fetched.
        actual: Sha256Digest,
    },
}

/// Hash the file at `path` and compare it with `expected`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn verify_file(expected: &Sha256Digest, path: &Path) -> std::io::Result<Verification> {
    let actual = compute_sha256(path)?;
    if &actual == expected {
        Ok(Verification::Verified(actual))
    } else {
        Ok(Verification::Mismatch {
            expected: expected.clone(),
            actual,
        })
    }
}
