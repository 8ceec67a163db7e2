//! Error types for the zup installer.
//!
//! [`InstallError`] is the tagged result of one install or verify run. Each
//! variant names one failure kind and carries the label of the manifest
//! being installed. [`InstallerError`] wraps it with the configuration,
//! catalogue, and output failures the CLI can hit.

use crate::artefact::extraction::ExtractionError;
use crate::artefact::fetch::FetchError;
use crate::config::ConfigError;
use crate::manifest::catalogue::CatalogueError;
use crate::manifest::error::ManifestError;
use crate::manifest::package_manifest::ManifestLabel;
use crate::manifest::sha256_digest::Sha256Digest;
use crate::placement::FilesystemError;
use std::fmt;
use thiserror::Error;

/// The four failure kinds an install run can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallErrorKind {
    /// Network, DNS, or HTTP failure.
    Fetch,
    /// The fetched bytes did not match the expected checksum.
    Integrity,
    /// The archive was malformed or lacked the binary entry.
    Extraction,
    /// Writing the executable into the destination failed.
    Filesystem,
}

impl InstallErrorKind {
    /// Return the kind name shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "FetchError",
            Self::Integrity => "IntegrityError",
            Self::Extraction => "ExtractionError",
            Self::Filesystem => "FilesystemError",
        }
    }
}

impl fmt::Display for InstallErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single install or verify run.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The artefact could not be fetched.
    #[error("FetchError: {label}: {source}")]
    Fetch {
        /// Manifest being installed.
        label: ManifestLabel,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The fetched artefact did not match the expected checksum.
    #[error("IntegrityError: {label}: expected sha256 {expected}, got {actual}")]
    Integrity {
        /// Manifest being installed.
        label: ManifestLabel,
        /// Checksum declared by the manifest.
        expected: Sha256Digest,
        /// Checksum of the bytes actually fetched.
        actual: Sha256Digest,
    },

    /// The binary could not be extracted from the archive.
    #[error("ExtractionError: {label}: {source}")]
    Extraction {
        /// Manifest being installed.
        label: ManifestLabel,
        /// Underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// The executable could not be written into the destination.
    #[error("FilesystemError: {label}: {source}")]
    Filesystem {
        /// Manifest being installed.
        label: ManifestLabel,
        /// Underlying filesystem failure.
        #[source]
        source: FilesystemError,
    },
}

impl InstallError {
    /// Return the failure kind.
    #[must_use]
    pub const fn kind(&self) -> InstallErrorKind {
        match self {
            Self::Fetch { .. } => InstallErrorKind::Fetch,
            Self::Integrity { .. } => InstallErrorKind::Integrity,
            Self::Extraction { .. } => InstallErrorKind::Extraction,
            Self::Filesystem { .. } => InstallErrorKind::Filesystem,
        }
    }

    /// Return the label of the manifest that failed.
    #[must_use]
    pub const fn label(&self) -> &ManifestLabel {
        match self {
            Self::Fetch { label, .. }
            | Self::Integrity { label, .. }
            | Self::Extraction { label, .. }
            | Self::Filesystem { label, .. } => label,
        }
    }
}

/// Errors surfaced by the installer CLI.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The release catalogue could not be loaded or queried.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// An ad-hoc manifest supplied on the command line was invalid.
    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    /// Fetching, verifying, extracting, or placing the artefact failed.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// An ad-hoc manifest was requested without one of its required flags.
    #[error("--url requires {flag}")]
    MissingFlag {
        /// The missing flag, e.g. `--sha256`.
        flag: &'static str,
    },

    /// No destination directory was configured and none could be derived.
    #[error("no destination directory; pass --destination or set `destination` in the config")]
    MissingDestination,

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn label() -> ManifestLabel {
        ManifestLabel {
            name: "zup".to_owned(),
            version: "0.1.2".to_owned(),
        }
    }

    fn digest(fill: char) -> Sha256Digest {
        Sha256Digest::try_from(fill.to_string().repeat(64)).expect("digest")
    }

    #[test]
    fn integrity_message_names_kind_package_and_digests() {
        let err = InstallError::Integrity {
            label: label(),
            expected: digest('a'),
            actual: digest('b'),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("IntegrityError: zup 0.1.2"));
        assert!(msg.contains(&"a".repeat(64)));
        assert!(msg.contains(&"b".repeat(64)));
        assert_eq!(err.kind(), InstallErrorKind::Integrity);
    }

    #[test]
    fn fetch_error_keeps_source_chain() {
        let err = InstallError::Fetch {
            label: label(),
            source: FetchError::NotFound {
                url: "https://example.com/zup.tar.gz".to_owned(),
            },
        };
        assert!(err.to_string().starts_with("FetchError: zup 0.1.2"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.label().name, "zup");
    }

    #[rstest]
    #[case::fetch(InstallErrorKind::Fetch, "FetchError")]
    #[case::integrity(InstallErrorKind::Integrity, "IntegrityError")]
    #[case::extraction(InstallErrorKind::Extraction, "ExtractionError")]
    #[case::filesystem(InstallErrorKind::Filesystem, "FilesystemError")]
    fn kind_display(#[case] kind: InstallErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn install_error_is_transparent_at_top_level() {
        let inner = InstallError::Extraction {
            label: label(),
            source: ExtractionError::EmptyArchive,
        };
        let expected = inner.to_string();
        let err = InstallerError::from(inner);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn write_failed_includes_reason() {
        let source = std::io::Error::other("broken pipe");
        let err = InstallerError::WriteFailed { source };
        assert!(err.to_string().contains("write"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
