//! Release manifest domain model.
//!
//! A manifest describes one installable release: the archive URL, the
//! SHA-256 digest it must match, the informational version, and the entry
//! inside the archive to install. Every field is a validated newtype, so a
//! malformed manifest is rejected when it is built rather than halfway
//! through an install.
//!
//! # Sub-modules
//!
//! - [`binary_name`] - Archive entry to install (`BinaryName`).
//! - [`catalogue`] - Per-release manifest set loaded from TOML.
//! - [`error`] - Field validation errors.
//! - [`package_manifest`] - The manifest itself and its key types.
//! - [`package_name`] - Package identifier newtype (`PackageName`).
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`source_url`] - HTTPS archive URL newtype (`SourceUrl`).
//! - [`version`] - Release version newtype (`Version`).

pub mod binary_name;
pub mod catalogue;
pub mod error;
pub mod package_manifest;
pub mod package_name;
pub mod sha256_digest;
pub mod source_url;
pub mod version;
