//! Checksum-verified fetch-and-install of a single release artefact.
//!
//! An install run fetches the archive named by a [`PackageManifest`] into a
//! private scratch directory, verifies its SHA-256 digest, extracts the
//! binary entry, and only then places it in the destination directory. The
//! scratch directory is dropped on every exit path.

use crate::artefact::digest::{Verification, verify_file};
use crate::artefact::extraction::{ArchiveExtractor, ArchiveFormatExtractor, ExtractionError};
use crate::artefact::fetch::{ArtefactFetcher, FetchError, HttpFetcher};
use crate::artefact::format::ArchiveFormat;
use crate::error::InstallError;
use crate::manifest::package_manifest::{ManifestLabel, PackageManifest};
use crate::manifest::sha256_digest::Sha256Digest;
use crate::placement::{FilesystemError, Placement};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of the scratch directory created for each run.
const SCRATCH_PREFIX: &str = "zup-installer-";

/// Sub-directory of the scratch area that receives the extracted entry.
const UNPACK_DIR: &str = "unpacked";

/// Final location of an installed executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPath(PathBuf);

impl InstalledPath {
    /// Return the installed path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for InstalledPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for InstalledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Stage failure before the manifest label is attached.
enum Failure {
    Fetch(FetchError),
    Integrity {
        expected: Sha256Digest,
        actual: Sha256Digest,
    },
    Extraction(ExtractionError),
    Filesystem(FilesystemError),
}

impl Failure {
    fn labelled(self, label: ManifestLabel) -> InstallError {
        match self {
            Self::Fetch(source) => InstallError::Fetch { label, source },
            Self::Integrity { expected, actual } => InstallError::Integrity {
                label,
                expected,
                actual,
            },
            Self::Extraction(source) => InstallError::Extraction { label, source },
            Self::Filesystem(source) => InstallError::Filesystem { label, source },
        }
    }
}

/// Install the binary described by `manifest` into `destination_dir`.
///
/// Uses the HTTP fetcher with the default timeout and the format-detecting
/// extractor. See [`install_with`] for the step-by-step contract.
///
/// # Errors
///
/// Returns an [`InstallError`] naming the failed step.
pub fn install(
    manifest: &PackageManifest,
    destination_dir: &Path,
) -> Result<InstalledPath, InstallError> {
    install_with(
        manifest,
        destination_dir,
        &HttpFetcher::default(),
        &ArchiveFormatExtractor,
    )
}

/// Install using the supplied fetcher and extractor.
///
/// Steps, each aborting the run on failure:
///
/// 1. Detect the archive format from the URL's final path segment.
/// 2. Fetch the archive into a scratch directory.
/// 3. Verify its SHA-256 digest against the manifest.
/// 4. Extract the binary entry into the scratch directory.
/// 5. Place it atomically in `destination_dir` with executable permission.
///
/// Nothing under `destination_dir` is created or modified before step 5.
///
/// # Errors
///
/// Returns [`InstallError::Fetch`], [`InstallError::Integrity`],
/// [`InstallError::Extraction`], or [`InstallError::Filesystem`].
pub fn install_with(
    manifest: &PackageManifest,
    destination_dir: &Path,
    fetcher: &dyn ArtefactFetcher,
    extractor: &dyn ArchiveExtractor,
) -> Result<InstalledPath, InstallError> {
    let label = manifest.label();
    info!("installing {label} into {}", destination_dir.display());
    run_install(manifest, destination_dir, fetcher, extractor)
        .map(InstalledPath)
        .map_err(|failure| failure.labelled(label))
}

/// Fetch and verify the artefact without installing anything.
///
/// # Errors
///
/// Returns [`InstallError::Fetch`], [`InstallError::Integrity`], or
/// [`InstallError::Filesystem`] when the scratch area is unusable.
pub fn verify(manifest: &PackageManifest) -> Result<Sha256Digest, InstallError> {
    verify_with(manifest, &HttpFetcher::default())
}

/// Fetch and verify using the supplied fetcher.
///
/// # Errors
///
/// See [`verify`].
pub fn verify_with(
    manifest: &PackageManifest,
    fetcher: &dyn ArtefactFetcher,
) -> Result<Sha256Digest, InstallError> {
    info!("verifying {}", manifest.label());
    let scratch = scratch_dir().map_err(|failure| failure.labelled(manifest.label()))?;
    let archive_path = scratch.path().join(manifest.source_url().file_name());
    fetch_verified(manifest, fetcher, &archive_path)
        .map_err(|failure| failure.labelled(manifest.label()))
}

fn run_install(
    manifest: &PackageManifest,
    destination_dir: &Path,
    fetcher: &dyn ArtefactFetcher,
    extractor: &dyn ArchiveExtractor,
) -> Result<PathBuf, Failure> {
    let file_name = manifest.source_url().file_name();
    let format = ArchiveFormat::from_file_name(file_name).ok_or_else(|| {
        Failure::Extraction(ExtractionError::UnsupportedFormat {
            file_name: file_name.to_owned(),
        })
    })?;

    let scratch = scratch_dir()?;
    let archive_path = scratch.path().join(file_name);
    fetch_verified(manifest, fetcher, &archive_path)?;

    let unpack_dir = scratch.path().join(UNPACK_DIR);
    std::fs::create_dir(&unpack_dir).map_err(|source| {
        Failure::Filesystem(FilesystemError::Scratch {
            path: unpack_dir.clone(),
            source,
        })
    })?;
    let staged = extractor
        .extract_entry(&archive_path, format, manifest.binary_name(), &unpack_dir)
        .map_err(Failure::Extraction)?;
    debug!("extracted {} to {}", manifest.binary_name(), staged.display());

    Placement::new(destination_dir)
        .place(&staged, manifest.binary_name().file_name())
        .map_err(Failure::Filesystem)
}

fn fetch_verified(
    manifest: &PackageManifest,
    fetcher: &dyn ArtefactFetcher,
    archive_path: &Path,
) -> Result<Sha256Digest, Failure> {
    let bytes = fetcher
        .fetch(manifest.source_url(), archive_path)
        .map_err(|err| match err {
            // Local disk trouble while writing the download is not a fetch failure.
            FetchError::Io(source) => Failure::Filesystem(FilesystemError::Scratch {
                path: archive_path.to_path_buf(),
                source,
            }),
            other => Failure::Fetch(other),
        })?;
    debug!("fetched {bytes} bytes to {}", archive_path.display());

    match verify_file(manifest.expected_checksum(), archive_path) {
        Ok(Verification::Verified(digest)) => {
            debug!("sha256 verified: {digest}");
            Ok(digest)
        }
        Ok(Verification::Mismatch { expected, actual }) => {
            Err(Failure::Integrity { expected, actual })
        }
        Err(source) => Err(Failure::Filesystem(FilesystemError::Scratch {
            path: archive_path.to_path_buf(),
            source,
        })),
    }
}

fn scratch_dir() -> Result<TempDir, Failure> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .map_err(|source| {
            Failure::Filesystem(FilesystemError::Scratch {
                path: std::env::temp_dir(),
                source,
            })
        })
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
