//! Directory resolution abstraction for platform-specific paths.
//!
//! The [`BaseDirs`] trait lets configuration and destination lookup be
//! exercised in tests without depending on the real home directory.

use std::path::PathBuf;

/// Platform directories the installer needs to locate.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Return the user configuration directory (e.g. `~/.config`).
    fn config_dir(&self) -> Option<PathBuf>;

    /// Return the directory user-installed executables go in.
    fn bin_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn config_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }

    #[cfg(unix)]
    fn bin_dir(&self) -> Option<PathBuf> {
        let dirs = directories_next::BaseDirs::new()?;
        Some(
            dirs.executable_dir()
                .map_or_else(|| dirs.home_dir().join(".local").join("bin"), PathBuf::from),
        )
    }

    #[cfg(not(unix))]
    fn bin_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new()
            .map(|dirs| dirs.data_local_dir().join("zup").join("bin"))
    }
}
