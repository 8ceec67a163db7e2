//! zup installer library.
//!
//! This crate fetches zup release archives, verifies their SHA-256
//! checksums, extracts the `zup` binary, and installs it with executable
//! permission. It is used by the `zup-installer` CLI binary and can be
//! consumed programmatically through [`installer::install`].
//!
//! # Modules
//!
//! - [`artefact`] - Fetching, digest verification, and archive extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Installer configuration file
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Install failure kinds and CLI error types
//! - [`install_flow`] - Install and verify command handlers
//! - [`installer`] - The checksum-verified install operation
//! - [`list`] - List command implementation
//! - [`list_output`] - Output formatting for release listing
//! - [`manifest`] - Release manifests and the release catalogue
//! - [`output`] - Progress and result message formatting
//! - [`placement`] - Atomic placement of the executable
//! - [`selection`] - Manifest and destination resolution

pub mod artefact;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod install_flow;
pub mod installer;
pub mod list;
pub mod list_output;
pub mod manifest;
pub mod output;
pub mod placement;
pub mod selection;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
