//! Output formatting for the installer CLI.
//!
//! Progress and errors go to stderr; the single machine-readable result of a
//! command (installed path, verified digest) goes to stdout.

use crate::manifest::package_manifest::PackageManifest;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(manifest: &PackageManifest, installed: &Path) -> String {
    format!(
        "Installed {} to {}",
        manifest.label(),
        installed.display()
    )
}

/// Format a success message after verification.
#[must_use]
pub fn verified_message(manifest: &PackageManifest) -> String {
    format!(
        "Verified {} (sha256 {})",
        manifest.label(),
        manifest.expected_checksum()
    )
}

/// Configuration information for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Release that would be installed.
    pub manifest: &'a PackageManifest,
    /// Directory the binary would be placed in.
    pub destination_dir: &'a Path,
    /// Fetch timeout that would apply.
    pub timeout: Duration,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let manifest = self.manifest;
        let target = self
            .destination_dir
            .join(manifest.binary_name().file_name());
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Package: {}", manifest.label()),
            format!("Source URL: {}", manifest.source_url()),
            format!("Expected sha256: {}", manifest.expected_checksum()),
            format!("Archive entry: {}", manifest.binary_name()),
            format!("Install path: {}", target.display()),
            format!("Fetch timeout: {}s", self.timeout.as_secs()),
        ]
        .join("\n")
    }
}
