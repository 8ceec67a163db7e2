//! Release catalogue: the per-version manifest set.
//!
//! A catalogue is a TOML document with one `[[release]]` table per published
//! release. Each table becomes an immutable [`CatalogueEntry`]. Entries are
//! identified by `(version, sha256)`, so two releases sharing a version but
//! shipping different archives coexist; only exact key duplicates are
//! rejected.

use super::binary_name::BinaryName;
use super::error::ManifestError;
use super::package_manifest::{ManifestFields, ManifestKey, PackageManifest};
use super::package_name::PackageName;
use super::sha256_digest::Sha256Digest;
use super::source_url::SourceUrl;
use super::version::Version;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Catalogue compiled into the binary.
const BUNDLED_CATALOGUE: &str = include_str!("../../data/releases.toml");

/// Errors arising from catalogue loading and release selection.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The catalogue file could not be read.
    #[error("failed to read catalogue {path}")]
    Read {
        /// Path of the catalogue file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalogue is not valid TOML or does not match the schema.
    #[error("invalid catalogue: {0}")]
    Parse(#[from] toml::de::Error),

    /// A release table holds a field that fails validation.
    #[error("invalid release #{index}: {source}")]
    InvalidEntry {
        /// One-based position of the release table.
        index: usize,
        /// The field validation failure.
        #[source]
        source: ManifestError,
    },

    /// Two release tables share the same `(version, sha256)` key.
    #[error("duplicate release {key}")]
    DuplicateEntry {
        /// The repeated key.
        key: ManifestKey,
    },

    /// The catalogue has no releases.
    #[error("catalogue contains no releases")]
    Empty,

    /// No release matches the requested version or checksum.
    #[error("no release matches {selector}")]
    NotFound {
        /// Human-readable description of the selection.
        selector: String,
    },

    /// Several releases match and no checksum prefix disambiguates them.
    #[error("{selector} matches several releases: {candidates}; pass a checksum prefix")]
    Ambiguous {
        /// Human-readable description of the selection.
        selector: String,
        /// Comma-separated candidate keys.
        candidates: String,
    },
}

/// One release from the catalogue: the manifest plus informational text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    #[serde(flatten)]
    manifest: PackageManifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage: Option<String>,
}

impl CatalogueEntry {
    /// Return the release manifest.
    #[must_use]
    pub const fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// Return the package description, if the release has one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Return the project homepage, if the release has one.
    #[must_use]
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }
}

/// Criteria for picking one release out of a catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSelector {
    /// Exact version string to match; `None` means any version.
    pub version: Option<String>,
    /// Leading characters of the archive checksum.
    pub checksum_prefix: Option<String>,
}

impl ReleaseSelector {
    fn describe(&self) -> String {
        match (&self.version, &self.checksum_prefix) {
            (Some(version), Some(prefix)) => format!("version {version} with checksum {prefix}"),
            (Some(version), None) => format!("version {version}"),
            (None, Some(prefix)) => format!("checksum {prefix}"),
            (None, None) => "the latest release".to_owned(),
        }
    }

    fn matches(&self, manifest: &PackageManifest) -> bool {
        let version_ok = self
            .version
            .as_deref()
            .is_none_or(|version| manifest.version().as_str() == version);
        let checksum_ok = self
            .checksum_prefix
            .as_deref()
            .is_none_or(|prefix| manifest.expected_checksum().starts_with(prefix));
        version_ok && checksum_ok
    }
}

/// An ordered, validated set of releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
}

/// Wire shape of a catalogue file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogueFile {
    #[serde(default)]
    release: Vec<RawRelease>,
}

/// Wire shape of one `[[release]]` table, before cross-field checks.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRelease {
    name: String,
    version: String,
    url: String,
    sha256: String,
    binary: Option<String>,
    description: Option<String>,
    homepage: Option<String>,
}

impl RawRelease {
    fn into_entry(self) -> Result<CatalogueEntry, ManifestError> {
        let binary_name = BinaryName::try_from(self.binary.as_deref().unwrap_or(&self.name))?;
        let manifest = PackageManifest::new(ManifestFields {
            name: PackageName::try_from(self.name)?,
            source_url: SourceUrl::try_from(self.url)?,
            expected_checksum: Sha256Digest::try_from(self.sha256)?,
            version: Version::try_from(self.version)?,
            binary_name,
        });
        Ok(CatalogueEntry {
            manifest,
            description: self.description,
            homepage: self.homepage,
        })
    }
}

impl Catalogue {
    /// Parse a catalogue from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Parse`] for malformed TOML or unknown keys,
    /// [`CatalogueError::InvalidEntry`] when a field fails validation, and
    /// [`CatalogueError::DuplicateEntry`] when a `(version, sha256)` key
    /// repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use zup_installer::manifest::catalogue::Catalogue;
    ///
    /// let catalogue = Catalogue::from_toml_str(concat!(
    ///     "[[release]]\n",
    ///     "name = \"zup\"\n",
    ///     "version = \"0.1.6\"\n",
    ///     "url = \"https://example.test/v0.1.6/zup.tar.gz\"\n",
    ///     "sha256 = \"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\"\n",
    /// ))
    /// .expect("valid catalogue");
    /// assert_eq!(catalogue.entries().len(), 1);
    /// assert_eq!(catalogue.entries()[0].manifest().binary_name().as_str(), "zup");
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogueError> {
        let file: CatalogueFile = toml::from_str(text)?;
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(file.release.len());
        for (position, raw) in file.release.into_iter().enumerate() {
            let entry = raw
                .into_entry()
                .map_err(|source| CatalogueError::InvalidEntry {
                    index: position + 1,
                    source,
                })?;
            let key = entry.manifest.key();
            if !seen.insert(key.clone()) {
                return Err(CatalogueError::DuplicateEntry { key });
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Read and parse a catalogue file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Read`] if the file cannot be read, or any
    /// error from [`Catalogue::from_toml_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, CatalogueError> {
        debug!("loading catalogue from {path}");
        let text = std::fs::read_to_string(path).map_err(|source| CatalogueError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse the catalogue compiled into this binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data file is itself invalid.
    pub fn bundled() -> Result<Self, CatalogueError> {
        Self::from_toml_str(BUNDLED_CATALOGUE)
    }

    /// Return every entry in file order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    /// Return every entry whose version string equals `version`.
    #[must_use]
    pub fn by_version(&self, version: &str) -> Vec<&CatalogueEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.manifest.version().as_str() == version)
            .collect()
    }

    /// Return the entry with the highest version.
    ///
    /// When several entries share the highest version, the one appearing
    /// last in the file wins.
    #[must_use]
    pub fn latest(&self) -> Option<&CatalogueEntry> {
        self.entries
            .iter()
            .max_by(|left, right| left.manifest.version().precedence(right.manifest.version()))
    }

    /// Pick exactly one entry using `selector`.
    ///
    /// With neither a version nor a checksum prefix, this is
    /// [`Catalogue::latest`]. Otherwise every filter must match and exactly
    /// one entry may remain.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Empty`] for an empty catalogue,
    /// [`CatalogueError::NotFound`] when nothing matches, and
    /// [`CatalogueError::Ambiguous`] when several entries match.
    pub fn select(&self, selector: &ReleaseSelector) -> Result<&CatalogueEntry, CatalogueError> {
        if self.entries.is_empty() {
            return Err(CatalogueError::Empty);
        }
        if selector.version.is_none() && selector.checksum_prefix.is_none() {
            return self.latest().ok_or(CatalogueError::Empty);
        }

        let candidates: Vec<&CatalogueEntry> = self
            .entries
            .iter()
            .filter(|entry| selector.matches(&entry.manifest))
            .collect();
        match candidates.as_slice() {
            [] => Err(CatalogueError::NotFound {
                selector: selector.describe(),
            }),
            [only] => Ok(*only),
            several => Err(CatalogueError::Ambiguous {
                selector: selector.describe(),
                candidates: several
                    .iter()
                    .map(|entry| entry.manifest.key().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
