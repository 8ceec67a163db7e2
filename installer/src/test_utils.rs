//! Shared test utilities for the installer crate.
//!
//! Builds release archives in memory and serves them through a stub
//! [`ArtefactFetcher`], so install flows can be exercised without network
//! access.

use crate::artefact::fetch::{ArtefactFetcher, FetchError};
use crate::manifest::package_manifest::{ManifestFields, PackageManifest};
use crate::manifest::source_url::SourceUrl;
use crate::manifest::{
    binary_name::BinaryName, package_name::PackageName, sha256_digest::Sha256Digest,
    version::Version,
};
use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::io::{self, Cursor, Write};
use std::path::Path;

/// Compute the lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::from_bytes(Sha256::digest(bytes).into()).into_inner()
}

/// Build a manifest for `zup` at `version`, fetched from `url`.
///
/// # Errors
///
/// Returns the first field validation failure.
pub fn zup_manifest(
    url: &str,
    sha256: &str,
    version: &str,
    binary: &str,
) -> Result<PackageManifest, crate::manifest::error::ManifestError> {
    Ok(PackageManifest::new(ManifestFields {
        name: PackageName::try_from("zup")?,
        source_url: SourceUrl::try_from(url)?,
        expected_checksum: Sha256Digest::try_from(sha256)?,
        version: Version::try_from(version)?,
        binary_name: BinaryName::try_from(binary)?,
    }))
}

fn append_entries<W: Write>(
    builder: &mut tar::Builder<W>,
    entries: &[(&str, &[u8])],
) -> io::Result<()> {
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents)?;
    }
    Ok(())
}

/// Build a `.tar.gz` archive holding `entries` as `(path, contents)`.
///
/// # Errors
///
/// Returns an I/O error if encoding fails.
pub fn tar_gz_archive(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_entries(&mut builder, entries)?;
    builder.into_inner()?.finish()
}

/// Build a `.tar.gz` archive whose header names are written verbatim.
///
/// Unlike [`tar_gz_archive`], paths such as `../zup` are not rejected, so
/// hostile archives can be reproduced.
///
/// # Errors
///
/// Returns an I/O error if encoding fails.
pub fn tar_gz_archive_verbatim(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        for (slot, byte) in header.as_old_mut().name.iter_mut().zip(path.bytes()) {
            *slot = byte;
        }
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, *contents)?;
    }
    builder.into_inner()?.finish()
}

/// Build a `.tar.zst` archive holding `entries` as `(path, contents)`.
///
/// # Errors
///
/// Returns an I/O error if encoding fails.
pub fn tar_zst_archive(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let encoder = zstd::Encoder::new(Vec::new(), 0)?;
    let mut builder = tar::Builder::new(encoder);
    append_entries(&mut builder, entries)?;
    builder.into_inner()?.finish()
}

/// Build a `.zip` archive holding `entries` as `(path, contents)`.
///
/// Paths ending in `/` become directory entries.
///
/// # Errors
///
/// Returns an I/O error if encoding fails.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> io::Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (path, contents) in entries {
        if path.ends_with('/') {
            writer.add_directory(*path, options).map_err(io::Error::other)?;
        } else {
            writer.start_file(*path, options).map_err(io::Error::other)?;
            writer.write_all(contents)?;
        }
    }
    Ok(writer.finish().map_err(io::Error::other)?.into_inner())
}

/// How a [`StubFetcher`] answers.
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Serve these bytes.
    Body(Vec<u8>),
    /// Answer with HTTP 404.
    NotFound,
    /// Fail before a response arrives.
    Unreachable(String),
}

/// An [`ArtefactFetcher`] that serves a canned response and counts calls.
#[derive(Debug)]
pub struct StubFetcher {
    response: StubResponse,
    calls: Cell<usize>,
}

impl StubFetcher {
    /// Serve `body` for every fetch.
    #[must_use]
    pub const fn serving(body: Vec<u8>) -> Self {
        Self::new(StubResponse::Body(body))
    }

    /// Answer every fetch with `response`.
    #[must_use]
    pub const fn new(response: StubResponse) -> Self {
        Self {
            response,
            calls: Cell::new(0),
        }
    }

    /// Return how many fetches were made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ArtefactFetcher for StubFetcher {
    fn fetch(&self, url: &SourceUrl, dest: &Path) -> Result<u64, FetchError> {
        self.calls.set(self.calls.get() + 1);
        match &self.response {
            StubResponse::Body(body) => {
                std::fs::write(dest, body)?;
                Ok(body.len() as u64)
            }
            StubResponse::NotFound => Err(FetchError::NotFound {
                url: url.as_str().to_owned(),
            }),
            StubResponse::Unreachable(reason) => Err(FetchError::HttpError {
                url: url.as_str().to_owned(),
                reason: reason.clone(),
            }),
        }
    }
}
