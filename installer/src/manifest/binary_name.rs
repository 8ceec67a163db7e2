//! Name of the executable to install from a release archive.

use super::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A validated archive entry path naming the binary to install.
///
/// The value is a relative path inside the archive (usually a bare file
/// name such as `zup`) made of plain `/`-separated segments, never `.`,
/// `..` or empty, so it can always be joined onto a directory safely.
///
/// # Examples
///
/// ```
/// use zup_installer::manifest::binary_name::BinaryName;
///
/// let bin = BinaryName::try_from("zup-v0.1.6/zup").expect("valid entry");
/// assert_eq!(bin.file_name(), "zup");
/// assert!(!bin.is_bare());
/// assert!(BinaryName::try_from("../zup").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinaryName(String);

impl BinaryName {
    /// Return the entry path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the entry as a relative path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Return the final path component, used as the installed file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Return true when the entry is a bare file name with no directory.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        !self.0.contains('/')
    }
}

impl TryFrom<&str> for BinaryName {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        validate_binary_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for BinaryName {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self> {
        validate_binary_name(&value)?;
        Ok(Self(value))
    }
}

impl From<BinaryName> for String {
    fn from(value: BinaryName) -> Self {
        value.0
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_binary_name(value: &str) -> Result<()> {
    let invalid = |reason: &str| ManifestError::InvalidBinaryName {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.is_empty() {
        return Err(invalid("binary name must not be empty"));
    }
    if value.contains('\\') {
        return Err(invalid("use '/' as the archive path separator"));
    }
    if value.ends_with('/') {
        return Err(invalid("binary name must name a file, not a directory"));
    }
    let path = Path::new(value);
    if path.is_absolute() || value.starts_with('/') {
        return Err(invalid("binary name must be relative to the archive root"));
    }
    // Checked on the raw text: `Path::components` drops `.` and empty segments.
    if value
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("binary name may only contain plain path components"));
    }
    Ok(())
}
