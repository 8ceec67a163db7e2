//! Installer configuration file.
//!
//! Settings are read from `<config_dir>/zup-installer/config.toml`, or from
//! the file named by `ZUP_INSTALLER_CONFIG`. A missing file yields the
//! defaults. Command-line flags take precedence over every value here.

use crate::artefact::fetch::DEFAULT_FETCH_TIMEOUT;
use crate::dirs::BaseDirs;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "ZUP_INSTALLER_CONFIG";

const CONFIG_DIR_NAME: &str = "zup-installer";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config file path.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// `timeout_secs` was zero.
    #[error("invalid config {path}: timeout_secs must be greater than zero")]
    ZeroTimeout {
        /// Config file path.
        path: Utf8PathBuf,
    },
}

/// Values read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Directory executables are installed into.
    pub destination: Option<Utf8PathBuf>,
    /// Release catalogue replacing the bundled one.
    pub catalogue: Option<Utf8PathBuf>,
    /// Fetch timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl InstallerConfig {
    /// Return the configured fetch timeout, or the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs)
    }
}

/// Return the path the configuration is read from, if one can be determined.
///
/// `ZUP_INSTALLER_CONFIG` wins over the platform config directory.
#[must_use]
pub fn config_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        return Utf8PathBuf::try_from(std::path::PathBuf::from(explicit))
            .inspect_err(|e| trace!("config_path: {CONFIG_ENV_VAR} is not valid UTF-8: {e}"))
            .ok();
    }

    let config_dir = dirs.config_dir()?;
    Utf8PathBuf::try_from(config_dir)
        .inspect_err(|e| trace!("config_path: config directory is not valid UTF-8: {e}"))
        .ok()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the configuration for the current user.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config(dirs: &dyn BaseDirs) -> Result<InstallerConfig, ConfigError> {
    config_path(dirs).map_or_else(
        || Ok(InstallerConfig::default()),
        |path| load_config_from(&path),
    )
}

/// Load the configuration from `path`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Utf8Path) -> Result<InstallerConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            trace!("no config at {path}; using defaults");
            return Ok(InstallerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_owned(),
                source,
            });
        }
    };

    let config: InstallerConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })?;
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::ZeroTimeout {
            path: path.to_owned(),
        });
    }
    debug!("loaded config from {path}");
    Ok(config)
}
