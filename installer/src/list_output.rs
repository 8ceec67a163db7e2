//! Output formatting for release listing.
//!
//! This module provides utilities to format catalogue entries for
//! human-readable or JSON output.

use crate::manifest::catalogue::{Catalogue, CatalogueEntry};
use serde::Serialize;

/// Format catalogue entries for human-readable output.
///
/// The latest release is marked so users know what a bare `install` picks.
///
/// # Examples
///
/// ```
/// use zup_installer::list_output::format_human;
/// use zup_installer::manifest::catalogue::Catalogue;
///
/// let catalogue = Catalogue::bundled().expect("bundled catalogue");
/// let output = format_human(&catalogue);
/// assert!(output.contains("zup 0.1.2"));
/// ```
#[must_use]
pub fn format_human(catalogue: &Catalogue) -> String {
    if catalogue.entries().is_empty() {
        return String::from("No releases in catalogue.");
    }

    let latest = catalogue.latest();
    let mut output = String::from("Releases:\n");
    for entry in catalogue.entries() {
        let manifest = entry.manifest();
        let marker = if is_same(latest, entry) { " (latest)" } else { "" };
        output.push('\n');
        output.push_str(&format!("  {}{marker}\n", manifest.label()));
        output.push_str(&format!("    url:    {}\n", manifest.source_url()));
        output.push_str(&format!("    sha256: {}\n", manifest.expected_checksum()));
        output.push_str(&format!("    binary: {}\n", manifest.binary_name()));
        if let Some(description) = entry.description() {
            output.push_str(&format!("    {description}\n"));
        }
    }
    output
}

/// Format catalogue entries as JSON.
#[must_use]
pub fn format_json(catalogue: &Catalogue) -> String {
    let latest = catalogue.latest();
    let json_data = CatalogueJson {
        releases: catalogue
            .entries()
            .iter()
            .map(|entry| ReleaseJson {
                latest: is_same(latest, entry),
                entry,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

fn is_same(latest: Option<&CatalogueEntry>, entry: &CatalogueEntry) -> bool {
    latest.is_some_and(|candidate| std::ptr::eq(candidate, entry))
}

/// JSON-serializable representation of the catalogue.
#[derive(Debug, Serialize)]
pub struct CatalogueJson<'a> {
    /// Releases in catalogue order.
    pub releases: Vec<ReleaseJson<'a>>,
}

/// JSON entry for one release.
#[derive(Debug, Serialize)]
pub struct ReleaseJson<'a> {
    /// Release fields.
    #[serde(flatten)]
    pub entry: &'a CatalogueEntry,
    /// Whether a bare `install` selects this release.
    pub latest: bool,
}
