//! Artefact handling: fetching, digest verification, and extraction.
//!
//! # Sub-modules
//!
//! - [`digest`] - Streaming SHA-256 computation and comparison.
//! - [`extraction`] - Single-entry archive extraction with path traversal
//!   protection.
//! - [`fetch`] - Artefact fetch trait and HTTP implementation.
//! - [`format`] - Archive format detection from file names.

pub mod digest;
pub mod extraction;
pub mod fetch;
pub mod format;
