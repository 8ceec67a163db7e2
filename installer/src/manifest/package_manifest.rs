//! The immutable descriptor of one installable release.

use super::binary_name::BinaryName;
use super::package_name::PackageName;
use super::sha256_digest::Sha256Digest;
use super::source_url::SourceUrl;
use super::version::Version;
use serde::Serialize;
use std::fmt;

/// One installable release: where to fetch it, what it must hash to, and
/// which file inside the archive to install.
///
/// Fields are private and there are no setters; a manifest is built once
/// from static configuration and only ever read by
/// [`install`](crate::installer::install).
///
/// # Examples
///
/// ```
/// use zup_installer::manifest::package_manifest::{ManifestFields, PackageManifest};
///
/// let manifest = PackageManifest::new(ManifestFields {
///     name: "zup".try_into().expect("name"),
///     source_url: "https://github.com/devglyph1/homebrew-zup/releases/download/v0.1.1/zup.tar.gz"
///         .try_into()
///         .expect("url"),
///     expected_checksum: "22fbae5b510a538d2066f755cb8207914d3d95a7e426c0e304fedc2cd2383ce1"
///         .try_into()
///         .expect("digest"),
///     version: "0.1.2".try_into().expect("version"),
///     binary_name: "zup".try_into().expect("binary"),
/// });
/// assert_eq!(manifest.label().to_string(), "zup 0.1.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    name: PackageName,
    #[serde(rename = "url")]
    source_url: SourceUrl,
    #[serde(rename = "sha256")]
    expected_checksum: Sha256Digest,
    version: Version,
    #[serde(rename = "binary")]
    binary_name: BinaryName,
}

/// Constructor arguments for [`PackageManifest`].
///
/// Groups the five validated fields so call sites name each one.
#[derive(Debug, Clone)]
pub struct ManifestFields {
    /// Package identifier.
    pub name: PackageName,
    /// Archive location.
    pub source_url: SourceUrl,
    /// SHA-256 digest the fetched archive must match.
    pub expected_checksum: Sha256Digest,
    /// Informational release version.
    pub version: Version,
    /// Entry inside the archive to install.
    pub binary_name: BinaryName,
}

impl PackageManifest {
    /// Build a manifest from validated fields.
    #[must_use]
    pub fn new(fields: ManifestFields) -> Self {
        let ManifestFields {
            name,
            source_url,
            expected_checksum,
            version,
            binary_name,
        } = fields;
        Self {
            name,
            source_url,
            expected_checksum,
            version,
            binary_name,
        }
    }

    /// Return the package name.
    #[must_use]
    pub const fn name(&self) -> &PackageName {
        &self.name
    }

    /// Return the archive URL.
    #[must_use]
    pub const fn source_url(&self) -> &SourceUrl {
        &self.source_url
    }

    /// Return the digest the fetched archive must match.
    #[must_use]
    pub const fn expected_checksum(&self) -> &Sha256Digest {
        &self.expected_checksum
    }

    /// Return the release version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Return the archive entry to install.
    #[must_use]
    pub const fn binary_name(&self) -> &BinaryName {
        &self.binary_name
    }

    /// Return the `(version, checksum)` identity of this manifest.
    #[must_use]
    pub fn key(&self) -> ManifestKey {
        ManifestKey {
            version: self.version.as_str().to_owned(),
            checksum: self.expected_checksum.clone(),
        }
    }

    /// Return the `name version` pair used in user-facing messages.
    #[must_use]
    pub fn label(&self) -> ManifestLabel {
        ManifestLabel {
            name: self.name.as_str().to_owned(),
            version: self.version.as_str().to_owned(),
        }
    }
}

/// Identity of a manifest within a catalogue.
///
/// Two releases may share a version string yet ship different archives;
/// the checksum keeps them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestKey {
    /// Version string as written.
    pub version: String,
    /// Archive digest.
    pub checksum: Sha256Digest,
}

impl fmt::Display for ManifestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.checksum.short(12))
    }
}

/// The `name` and `version` of a manifest, carried by every install error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLabel {
    /// Package name.
    pub name: String,
    /// Version string.
    pub version: String,
}

impl fmt::Display for ManifestLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
