//! Release version newtype.
//!
//! Versions are informational: the installer never resolves anything from
//! them. The catalogue uses [`Version::precedence`] to pick the latest
//! release when the user does not name one.

use super::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A `MAJOR.MINOR.PATCH` version string with optional `-pre` and `+build`
/// suffixes.
///
/// # Examples
///
/// ```
/// use zup_installer::manifest::version::Version;
///
/// let version = Version::try_from("0.1.6").expect("valid version");
/// assert_eq!(version.core(), (0, 1, 6));
/// assert!(Version::try_from("v0.1.6").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    raw: String,
    core: (u64, u64, u64),
    pre: Option<String>,
}

impl Version {
    /// Return the version exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Return the numeric `(major, minor, patch)` core.
    #[must_use]
    pub const fn core(&self) -> (u64, u64, u64) {
        self.core
    }

    /// Return the pre-release label, if any.
    #[must_use]
    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    /// Compare two versions by release precedence.
    ///
    /// The numeric core decides first; a pre-release sorts before the
    /// matching plain release, and pre-release labels compare
    /// lexicographically. Build metadata is ignored.
    #[must_use]
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.core
            .cmp(&other.core)
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => left.cmp(right),
            })
    }
}

impl TryFrom<&str> for Version {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        parse_version(value)
    }
}

impl TryFrom<String> for Version {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self> {
        parse_version(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.raw
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn parse_version(value: &str) -> Result<Version> {
    let invalid = |reason: &str| ManifestError::InvalidVersion {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    let without_build = value.split_once('+').map_or(value, |(head, build)| {
        if build.is_empty() { "" } else { head }
    });
    let (core_text, pre) = match without_build.split_once('-') {
        Some((_, "")) => return Err(invalid("empty pre-release label")),
        Some((core_text, pre)) => (core_text, Some(pre.to_owned())),
        None => (without_build, None),
    };

    let mut parts = core_text.split('.');
    let major = parse_component(parts.next()).ok_or_else(|| invalid("missing major version"))?;
    let minor = parse_component(parts.next()).ok_or_else(|| invalid("missing minor version"))?;
    let patch = parse_component(parts.next()).ok_or_else(|| invalid("missing patch version"))?;
    if parts.next().is_some() {
        return Err(invalid("expected exactly three numeric components"));
    }

    Ok(Version {
        raw: value.to_owned(),
        core: (major, minor, patch),
        pre,
    })
}

fn parse_component(part: Option<&str>) -> Option<u64> {
    part.filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        .and_then(|text| text.parse().ok())
}
