//! Artefact fetching for release archives.
//!
//! Provides a trait-based abstraction over the single HTTPS GET that
//! retrieves a release archive, so tests can serve bytes without network
//! access.

use crate::manifest::source_url::SourceUrl;
use log::debug;
use std::path::Path;
use std::time::Duration;

/// Default network timeout for one archive fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching an archive from its source URL.
///
/// # Examples
///
/// ```
/// use zup_installer::artefact::fetch::HttpFetcher;
///
/// let fetcher = HttpFetcher::default();
/// // Use fetcher.fetch(&url, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher {
    /// Fetch `url` and write the response body to `dest`.
    ///
    /// Returns the number of bytes written. Exactly one request is made;
    /// there are no retries.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, a non-success status,
    /// or when `dest` cannot be written.
    fn fetch(&self, url: &SourceUrl, dest: &Path) -> Result<u64, FetchError>;
}

/// Errors arising from archive fetches.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed before a response arrived, or the body transfer
    /// was interrupted.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered with a non-success status other than 404.
    #[error("download failed for {url}: HTTP status {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The archive was not found (HTTP 404).
    #[error("archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The request exceeded the configured timeout.
    #[error("download timed out for {url}")]
    Timeout {
        /// The URL that was requested.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based fetcher using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl ArtefactFetcher for HttpFetcher {
    fn fetch(&self, url: &SourceUrl, dest: &Path) -> Result<u64, FetchError> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| map_ureq_error(url.as_str(), &e))?;
        let mut file = std::fs::File::create(dest)?;
        let written = std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(
            |e| FetchError::HttpError {
                url: url.as_str().to_owned(),
                reason: e.to_string(),
            },
        )?;
        debug!("fetched {written} bytes from {url}");
        Ok(written)
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_owned(),
            status: *status,
        },
        ureq::Error::Timeout(_) => FetchError::Timeout {
            url: url.to_owned(),
        },
        other => FetchError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
