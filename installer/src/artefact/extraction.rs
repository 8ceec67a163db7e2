//! Binary extraction from release archives.
//!
//! Locates one named entry inside a `.tar.gz`, `.tar.zst`, or `.zip`
//! archive and writes its bytes into a scratch directory. Every entry path
//! is checked for traversal before it is considered, so a hostile archive
//! is rejected outright rather than partially trusted.

use super::format::ArchiveFormat;
use crate::manifest::binary_name::BinaryName;
use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Unix file-type bits for a symbolic link, as stored in zip external
/// attributes.
const UNIX_SYMLINK_MODE: u32 = 0o120_000;
const UNIX_FILE_TYPE_MASK: u32 = 0o170_000;

/// Trait for extracting one entry from an archive, enabling test mocking.
///
/// # Examples
///
/// ```
/// use zup_installer::artefact::extraction::ArchiveFormatExtractor;
///
/// let extractor = ArchiveFormatExtractor;
/// // Use extractor.extract_entry(archive, format, entry, scratch_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract `entry` from the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the path of the extracted file, which is named after the
    /// entry's final component.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the archive root, [`ExtractionError::MissingEntry`] or
    /// [`ExtractionError::AmbiguousEntry`] if `entry` cannot be located
    /// uniquely, [`ExtractionError::NotAFile`] if it is not a regular file,
    /// and [`ExtractionError::Malformed`] if the archive cannot be read.
    fn extract_entry(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        entry: &BinaryName,
        dest_dir: &Path,
    ) -> Result<PathBuf, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error writing the extracted file.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be decoded.
    #[error("malformed {format} archive: {reason}")]
    Malformed {
        /// The format the archive was read as.
        format: ArchiveFormat,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The archive file name has no supported suffix.
    #[error("unsupported archive format: {file_name}")]
    UnsupportedFormat {
        /// The archive file name.
        file_name: String,
    },

    /// A path in the archive attempts to traverse outside the archive root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive is empty")]
    EmptyArchive,

    /// No entry matches the requested binary.
    #[error("archive has no entry named {entry}")]
    MissingEntry {
        /// The requested entry.
        entry: String,
    },

    /// Several entries match a bare binary name.
    #[error("archive has several entries named {entry}: {candidates}")]
    AmbiguousEntry {
        /// The requested entry.
        entry: String,
        /// Comma-separated matching paths.
        candidates: String,
    },

    /// The matching entry is a directory, link, or special file.
    #[error("archive entry {path} is not a regular file")]
    NotAFile {
        /// The matching entry path.
        path: String,
    },
}

/// Kind of an archive entry, as far as installation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic or hard link.
    Link,
    /// Any other entry type (devices, FIFOs, metadata records).
    Other,
}

/// One archive entry: its normalised path, kind, and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Entry path with `.` components removed.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Zero-based position in the archive.
    pub index: usize,
}

/// Default extractor dispatching on [`ArchiveFormat`] to the `tar`,
/// `flate2`, `zstd`, and `zip` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveFormatExtractor;

impl ArchiveExtractor for ArchiveFormatExtractor {
    fn extract_entry(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        entry: &BinaryName,
        dest_dir: &Path,
    ) -> Result<PathBuf, ExtractionError> {
        let entries = match format {
            ArchiveFormat::TarGz | ArchiveFormat::TarZst => list_tar(archive_path, format)?,
            ArchiveFormat::Zip => list_zip(archive_path)?,
        };
        trace!("{} entries in {}", entries.len(), archive_path.display());

        let chosen = choose_entry(&entries, entry)?;
        debug!("extracting {} for {entry}", chosen.path.display());

        let dest_path = dest_dir.join(entry.file_name());
        match format {
            ArchiveFormat::TarGz | ArchiveFormat::TarZst => {
                unpack_tar(archive_path, format, chosen.index, &dest_path)?;
            }
            ArchiveFormat::Zip => unpack_zip(archive_path, chosen.index, &dest_path)?,
        }
        Ok(dest_path)
    }
}

/// Pick the entry to install.
///
/// An entry whose path equals `binary` wins; if a tar archive repeats it,
/// the last copy wins, matching tar's append semantics. Failing that, a
/// bare binary name also matches `<top-level-dir>/<binary>`, provided
/// exactly one such path exists; repeats of that path also keep the last
/// copy.
///
/// # Errors
///
/// Returns [`ExtractionError::EmptyArchive`], [`ExtractionError::MissingEntry`],
/// [`ExtractionError::AmbiguousEntry`], or [`ExtractionError::NotAFile`].
pub fn choose_entry<'a>(
    entries: &'a [EntryInfo],
    binary: &BinaryName,
) -> Result<&'a EntryInfo, ExtractionError> {
    if entries.is_empty() {
        return Err(ExtractionError::EmptyArchive);
    }

    let chosen = entries
        .iter()
        .rev()
        .find(|info| info.path == binary.as_path())
        .map_or_else(|| choose_nested(entries, binary), Ok)?;

    if chosen.kind != EntryKind::File {
        return Err(ExtractionError::NotAFile {
            path: chosen.path.display().to_string(),
        });
    }
    Ok(chosen)
}

fn choose_nested<'a>(
    entries: &'a [EntryInfo],
    binary: &BinaryName,
) -> Result<&'a EntryInfo, ExtractionError> {
    let missing = || ExtractionError::MissingEntry {
        entry: binary.to_string(),
    };
    if !binary.is_bare() {
        return Err(missing());
    }

    // Walk backwards so a repeated path keeps its last copy.
    let mut nested: Vec<&EntryInfo> = Vec::new();
    for info in entries.iter().rev().filter(|info| {
        info.path.components().count() == 2
            && info.path.file_name().is_some_and(|name| name == binary.as_str())
    }) {
        if !nested.iter().any(|seen| seen.path == info.path) {
            nested.push(info);
        }
    }
    nested.reverse();

    match nested.as_slice() {
        [] => Err(missing()),
        [only] => Ok(*only),
        several => Err(ExtractionError::AmbiguousEntry {
            entry: binary.to_string(),
            candidates: several
                .iter()
                .map(|info| info.path.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Validate that an entry path does not escape the archive root via `..`
/// components or absolute paths, and strip `.` components.
fn normalise_entry_path(path: &Path) -> Result<PathBuf, ExtractionError> {
    let traversal = || ExtractionError::PathTraversal {
        path: path.display().to_string(),
    };
    if path.is_absolute() {
        return Err(traversal());
    }
    let mut normalised = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalised.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(traversal());
            }
        }
    }
    Ok(normalised)
}

fn malformed(format: ArchiveFormat, err: &dyn std::fmt::Display) -> ExtractionError {
    ExtractionError::Malformed {
        format,
        reason: err.to_string(),
    }
}

fn open_tar(
    archive_path: &Path,
    format: ArchiveFormat,
) -> Result<tar::Archive<Box<dyn Read>>, ExtractionError> {
    let file = File::open(archive_path)?;
    let decoder: Box<dyn Read> = match format {
        ArchiveFormat::TarGz => Box::new(flate2::read::GzDecoder::new(file)),
        ArchiveFormat::TarZst => {
            Box::new(zstd::Decoder::new(file).map_err(|e| malformed(format, &e))?)
        }
        ArchiveFormat::Zip => return Err(malformed(format, &"not a tar archive")),
    };
    Ok(tar::Archive::new(decoder))
}

fn tar_entry_kind(entry_type: tar::EntryType) -> EntryKind {
    if entry_type.is_file() {
        EntryKind::File
    } else if entry_type.is_dir() {
        EntryKind::Directory
    } else if entry_type.is_symlink() || entry_type.is_hard_link() {
        EntryKind::Link
    } else {
        EntryKind::Other
    }
}

fn list_tar(archive_path: &Path, format: ArchiveFormat) -> Result<Vec<EntryInfo>, ExtractionError> {
    let mut archive = open_tar(archive_path, format)?;
    let mut entries = Vec::new();
    for (index, entry_result) in archive
        .entries()
        .map_err(|e| malformed(format, &e))?
        .enumerate()
    {
        let entry = entry_result.map_err(|e| malformed(format, &e))?;
        let raw_path = entry.path().map_err(|e| malformed(format, &e))?;
        let path = normalise_entry_path(&raw_path)?;
        if path.as_os_str().is_empty() {
            continue;
        }
        entries.push(EntryInfo {
            path,
            kind: tar_entry_kind(entry.header().entry_type()),
            index,
        });
    }
    Ok(entries)
}

fn unpack_tar(
    archive_path: &Path,
    format: ArchiveFormat,
    index: usize,
    dest_path: &Path,
) -> Result<(), ExtractionError> {
    let mut archive = open_tar(archive_path, format)?;
    let mut entry = archive
        .entries()
        .map_err(|e| malformed(format, &e))?
        .nth(index)
        .ok_or_else(|| malformed(format, &"archive changed while extracting"))?
        .map_err(|e| malformed(format, &e))?;
    let mut out = File::create(dest_path)?;
    io::copy(&mut entry, &mut out).map_err(|e| malformed(format, &e))?;
    Ok(())
}

fn zip_entry_kind(unix_mode: Option<u32>, is_dir: bool, is_file: bool) -> EntryKind {
    let is_link = unix_mode.is_some_and(|mode| mode & UNIX_FILE_TYPE_MASK == UNIX_SYMLINK_MODE);
    if is_link {
        EntryKind::Link
    } else if is_dir {
        EntryKind::Directory
    } else if is_file {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn open_zip(archive_path: &Path) -> Result<zip::ZipArchive<File>, ExtractionError> {
    let file = File::open(archive_path)?;
    zip::ZipArchive::new(file).map_err(|e| malformed(ArchiveFormat::Zip, &e))
}

fn list_zip(archive_path: &Path) -> Result<Vec<EntryInfo>, ExtractionError> {
    let mut archive = open_zip(archive_path)?;
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive
            .by_index(index)
            .map_err(|e| malformed(ArchiveFormat::Zip, &e))?;
        let path = normalise_entry_path(Path::new(file.name()))?;
        if path.as_os_str().is_empty() {
            continue;
        }
        entries.push(EntryInfo {
            path,
            kind: zip_entry_kind(file.unix_mode(), file.is_dir(), file.is_file()),
            index,
        });
    }
    Ok(entries)
}

fn unpack_zip(archive_path: &Path, index: usize, dest_path: &Path) -> Result<(), ExtractionError> {
    let mut archive = open_zip(archive_path)?;
    let mut file = archive
        .by_index(index)
        .map_err(|e| malformed(ArchiveFormat::Zip, &e))?;
    let mut out = File::create(dest_path)?;
    io::copy(&mut file, &mut out).map_err(|e| malformed(ArchiveFormat::Zip, &e))?;
    Ok(())
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
