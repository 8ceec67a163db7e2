//! Error types for manifest field validation.
//!
//! Each variant names the field that was rejected and the constraint it
//! violated, so a bad catalogue entry can be fixed without guesswork.

use thiserror::Error;

/// Errors arising from invalid manifest field values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The package name is empty or contains unsupported characters.
    #[error("invalid package name \"{value}\": {reason}")]
    InvalidPackageName {
        /// The rejected name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The source URL is not an HTTPS URL naming an archive.
    #[error("invalid source URL \"{value}\": {reason}")]
    InvalidSourceUrl {
        /// The rejected URL.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The version string is not `MAJOR.MINOR.PATCH`.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The binary name is not a safe relative path.
    #[error("invalid binary name \"{value}\": {reason}")]
    InvalidBinaryName {
        /// The rejected binary name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
