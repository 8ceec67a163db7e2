//! Source URL newtype for release archives.

use super::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const HTTPS_SCHEME: &str = "https://";

/// A validated HTTPS URL whose final path segment names the archive.
///
/// # Examples
///
/// ```
/// use zup_installer::manifest::source_url::SourceUrl;
///
/// let url = SourceUrl::try_from(
///     "https://github.com/devglyph1/homebrew-zup/releases/download/v0.1.1/zup.tar.gz",
/// )
/// .expect("valid URL");
/// assert_eq!(url.host(), "github.com");
/// assert_eq!(url.file_name(), "zup.tar.gz");
/// assert!(SourceUrl::try_from("http://example.com/zup.tar.gz").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Return the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the authority part of the URL.
    #[must_use]
    pub fn host(&self) -> &str {
        split_url(&self.0).map_or("", |(host, _)| host)
    }

    /// Return the final path segment with any query or fragment removed.
    #[must_use]
    pub fn file_name(&self) -> &str {
        split_url(&self.0)
            .and_then(|(_, path)| archive_segment(path))
            .unwrap_or_default()
    }
}

impl TryFrom<&str> for SourceUrl {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        validate_source_url(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for SourceUrl {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self> {
        validate_source_url(&value)?;
        Ok(Self(value))
    }
}

impl From<SourceUrl> for String {
    fn from(value: SourceUrl) -> Self {
        value.0
    }
}

impl AsRef<str> for SourceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split an HTTPS URL into `(host, path)`.
fn split_url(value: &str) -> Option<(&str, &str)> {
    let rest = value.strip_prefix(HTTPS_SCHEME)?;
    Some(rest.split_once('/').unwrap_or((rest, "")))
}

/// Return the last non-empty path segment, ignoring query and fragment.
fn archive_segment(path: &str) -> Option<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path.get(..end)?
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

fn validate_source_url(value: &str) -> Result<()> {
    let invalid = |reason: &str| ManifestError::InvalidSourceUrl {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("URL must not contain whitespace"));
    }
    let (host, path) = split_url(value).ok_or_else(|| invalid("URL must use the https scheme"))?;
    if host.is_empty() {
        return Err(invalid("URL has no host"));
    }
    if archive_segment(path).is_none() {
        return Err(invalid("URL path must end with the archive file name"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::release(
        "https://github.com/devglyph1/homebrew-zup/releases/download/v0.1.6/zup.tar.gz",
        "github.com",
        "zup.tar.gz"
    )]
    #[case::query("https://example.test/dl/zup.zip?token=1", "example.test", "zup.zip")]
    #[case::port("https://localhost:8443/zup.tar.zst", "localhost:8443", "zup.tar.zst")]
    fn splits_host_and_file_name(#[case] value: &str, #[case] host: &str, #[case] file: &str) {
        let url = SourceUrl::try_from(value).expect("valid URL");
        assert_eq!(url.host(), host);
        assert_eq!(url.file_name(), file);
    }

    #[rstest]
    #[case::plain_http("http://example.test/zup.tar.gz")]
    #[case::no_scheme("example.test/zup.tar.gz")]
    #[case::no_host("https:///zup.tar.gz")]
    #[case::no_path("https://example.test")]
    #[case::trailing_slash("https://example.test/releases/")]
    #[case::whitespace("https://example.test/zup .tar.gz")]
    fn rejects_invalid_urls(#[case] value: &str) {
        assert!(matches!(
            SourceUrl::try_from(value),
            Err(ManifestError::InvalidSourceUrl { .. })
        ));
    }
}
