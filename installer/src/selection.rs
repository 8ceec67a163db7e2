//! Resolve the manifest and destination a command acts on.
//!
//! A release comes either from explicit `--url`/`--sha256`/`--release` flags
//! or from a catalogue: the one named on the command line, else the one in
//! the config file, else the bundled catalogue.

use crate::cli::ReleaseArgs;
use crate::config::InstallerConfig;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::manifest::binary_name::BinaryName;
use crate::manifest::catalogue::{Catalogue, ReleaseSelector};
use crate::manifest::package_manifest::{ManifestFields, PackageManifest};
use crate::manifest::package_name::PackageName;
use crate::manifest::sha256_digest::Sha256Digest;
use crate::manifest::source_url::SourceUrl;
use crate::manifest::version::Version;
use camino::Utf8Path;
use log::debug;
use std::path::PathBuf;

/// Package name used for ad-hoc releases when `--name` is absent.
pub const DEFAULT_PACKAGE_NAME: &str = "zup";

/// Load the catalogue named by `cli_path`, the config, or the bundled one.
///
/// # Errors
///
/// Returns [`InstallerError::Catalogue`] if the catalogue cannot be read or
/// parsed.
pub fn load_catalogue(
    cli_path: Option<&Utf8Path>,
    config: &InstallerConfig,
) -> Result<Catalogue> {
    let catalogue = cli_path.or(config.catalogue.as_deref()).map_or_else(
        || {
            debug!("using bundled catalogue");
            Catalogue::bundled()
        },
        Catalogue::load,
    )?;
    Ok(catalogue)
}

/// Build the manifest selected by `args`.
///
/// # Errors
///
/// Returns [`InstallerError::Manifest`] or [`InstallerError::MissingFlag`]
/// for an invalid ad-hoc release, or [`InstallerError::Catalogue`] when no
/// single catalogue entry matches.
pub fn resolve_manifest(args: &ReleaseArgs, config: &InstallerConfig) -> Result<PackageManifest> {
    if let Some(url) = args.url.as_deref() {
        return ad_hoc_manifest(url, args);
    }

    let catalogue = load_catalogue(args.catalogue.as_deref(), config)?;
    let selector = ReleaseSelector {
        version: args.release.clone(),
        checksum_prefix: args.checksum.clone(),
    };
    let entry = catalogue.select(&selector)?;
    debug!("selected {} from catalogue", entry.manifest().key());
    Ok(entry.manifest().clone())
}

fn ad_hoc_manifest(url: &str, args: &ReleaseArgs) -> Result<PackageManifest> {
    let sha256 = args
        .sha256
        .as_deref()
        .ok_or(InstallerError::MissingFlag { flag: "--sha256" })?;
    let version = args
        .release
        .as_deref()
        .ok_or(InstallerError::MissingFlag { flag: "--release" })?;
    let name = args.name.as_deref().unwrap_or(DEFAULT_PACKAGE_NAME);
    let binary = args.binary.as_deref().unwrap_or(name);

    Ok(PackageManifest::new(ManifestFields {
        name: PackageName::try_from(name)?,
        source_url: SourceUrl::try_from(url)?,
        expected_checksum: Sha256Digest::try_from(sha256.to_ascii_lowercase())?,
        version: Version::try_from(version)?,
        binary_name: BinaryName::try_from(binary)?,
    }))
}

/// Pick the install destination: CLI flag, then config, then platform default.
///
/// # Errors
///
/// Returns [`InstallerError::MissingDestination`] when none is available.
pub fn resolve_destination(
    cli_destination: Option<&Utf8Path>,
    config: &InstallerConfig,
    dirs: &dyn BaseDirs,
) -> Result<PathBuf> {
    cli_destination
        .or(config.destination.as_deref())
        .map(|path| path.as_std_path().to_path_buf())
        .or_else(|| dirs.bin_dir())
        .ok_or(InstallerError::MissingDestination)
}
