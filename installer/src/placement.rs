//! Placement of the extracted executable into its destination directory.
//!
//! The executable is written to a hidden temporary file inside the
//! destination directory and then renamed over the final name, so a reader
//! of the destination path sees either the previous file or the complete new
//! one, never a partial write.

use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Prefix used for the in-flight temporary file.
const TEMP_PREFIX: &str = ".zup-installer-";

/// Permission bits applied to the installed executable.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Filesystem failures while creating or writing the installed executable.
#[derive(Debug, thiserror::Error)]
pub enum FilesystemError {
    /// The destination directory could not be created.
    #[error("failed to create destination directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A temporary file could not be created in the destination directory.
    #[error("failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory in which creation was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Copying the executable bytes failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The executable bit could not be set.
    #[error("failed to set permissions on {path}: {source}")]
    Permissions {
        /// File whose mode could not be changed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Renaming the temporary file over the destination failed.
    #[error("failed to move executable into {path}: {source}")]
    Persist {
        /// Final destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The private scratch area could not be used.
    #[error("scratch space error at {path}: {source}")]
    Scratch {
        /// Scratch path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Places executables into a single destination directory.
#[derive(Debug, Clone)]
pub struct Placement {
    destination_dir: PathBuf,
}

impl Placement {
    /// Create a placement targeting `destination_dir`.
    #[must_use]
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
        }
    }

    /// Return the final path for an executable called `file_name`.
    #[must_use]
    pub fn target_path(&self, file_name: &str) -> PathBuf {
        self.destination_dir.join(file_name)
    }

    /// Copy `staged` into the destination as `file_name`, marked executable.
    ///
    /// The destination directory is created when absent. An existing file of
    /// the same name is replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemError`] describing the step that failed. The
    /// temporary file is removed on every failure path.
    pub fn place(&self, staged: &Path, file_name: &str) -> Result<PathBuf, FilesystemError> {
        let dir = &self.destination_dir;
        fs::create_dir_all(dir).map_err(|source| FilesystemError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(dir)
            .map_err(|source| FilesystemError::TempFile {
                path: dir.clone(),
                source,
            })?;

        let mut reader = File::open(staged).map_err(|source| FilesystemError::Scratch {
            path: staged.to_path_buf(),
            source,
        })?;
        let temp_path = temp.path().to_path_buf();
        io::copy(&mut reader, temp.as_file_mut())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|source| FilesystemError::Write {
                path: temp_path.clone(),
                source,
            })?;

        set_executable(temp.as_file()).map_err(|source| FilesystemError::Permissions {
            path: temp_path,
            source,
        })?;

        let target = self.target_path(file_name);
        temp.persist(&target)
            .map_err(|err| FilesystemError::Persist {
                path: target.clone(),
                source: err.error,
            })?;

        debug!("placed executable at {}", target.display());
        Ok(target)
    }
}

#[cfg(unix)]
fn set_executable(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(_file: &File) -> io::Result<()> {
    Ok(())
}
