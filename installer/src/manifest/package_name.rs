//! Package name newtype.

use super::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated package identifier such as `zup`.
///
/// Names are restricted to ASCII alphanumerics and `-_.+@`, the character
/// set Homebrew accepts for formula names.
///
/// # Examples
///
/// ```
/// use zup_installer::manifest::package_name::PackageName;
///
/// let name = PackageName::try_from("zup").expect("valid name");
/// assert_eq!(name.as_str(), "zup");
/// assert!(PackageName::try_from("zup/../evil").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PackageName {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        validate_package_name(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for PackageName {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self> {
        validate_package_name(&value)?;
        Ok(Self(value))
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_package_name(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ManifestError::InvalidPackageName {
            value: value.to_owned(),
            reason: "name must not be empty".to_owned(),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '@')))
    {
        return Err(ManifestError::InvalidPackageName {
            value: value.to_owned(),
            reason: format!("unsupported character '{bad}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("zup")]
    #[case::versioned("zup@0.1")]
    #[case::hyphenated("zup-cli")]
    fn accepts_formula_style_names(#[case] value: &str) {
        assert!(PackageName::try_from(value).is_ok());
    }

    #[rstest]
    #[case::empty("")]
    #[case::slash("zup/cli")]
    #[case::space("zup cli")]
    fn rejects_bad_names(#[case] value: &str) {
        assert!(matches!(
            PackageName::try_from(value),
            Err(ManifestError::InvalidPackageName { .. })
        ));
    }
}
