//! Unit tests for release catalogue parsing and selection.

use super::*;
use rstest::rstest;

const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const SHA_C: &str = "cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

fn release(version: &str, sha: &str) -> String {
    format!(
        concat!(
            "[[release]]\n",
            "name = \"zup\"\n",
            "version = \"{version}\"\n",
            "url = \"https://example.test/v{version}/zup.tar.gz\"\n",
            "sha256 = \"{sha}\"\n\n",
        ),
        version = version,
        sha = sha,
    )
}

/// A catalogue mirroring the historical formula set: 0.1.6 was published
/// twice with different archives.
fn historical() -> Catalogue {
    let text = [
        release("0.1.2", SHA_A),
        release("0.1.6", SHA_B),
        release("0.1.6", SHA_C),
    ]
    .concat();
    Catalogue::from_toml_str(&text).expect("valid catalogue")
}

#[test]
fn bundled_catalogue_parses() {
    let catalogue = Catalogue::bundled().expect("bundled catalogue");
    let entry = catalogue.latest().expect("bundled release");
    assert_eq!(entry.manifest().name().as_str(), "zup");
    assert_eq!(entry.manifest().binary_name().as_str(), "zup");
    assert!(entry.homepage().is_some());
}

#[test]
fn binary_defaults_to_package_name() {
    let catalogue = Catalogue::from_toml_str(&release("0.1.2", SHA_A)).expect("valid");
    let manifest = catalogue.entries()[0].manifest();
    assert_eq!(manifest.binary_name().as_str(), "zup");
}

#[test]
fn same_version_with_different_checksums_is_kept() {
    let catalogue = historical();
    assert_eq!(catalogue.entries().len(), 3);
    assert_eq!(catalogue.by_version("0.1.6").len(), 2);
}

#[test]
fn exact_duplicate_key_is_rejected() {
    let text = [release("0.1.6", SHA_B), release("0.1.6", SHA_B)].concat();
    let err = Catalogue::from_toml_str(&text).expect_err("duplicate key");
    assert!(matches!(err, CatalogueError::DuplicateEntry { .. }));
}

#[test]
fn invalid_field_reports_release_position() {
    let text = [release("0.1.2", SHA_A), release("0.1.6", "short")].concat();
    let err = Catalogue::from_toml_str(&text).expect_err("invalid digest");
    assert!(matches!(
        err,
        CatalogueError::InvalidEntry {
            index: 2,
            source: ManifestError::InvalidSha256Digest { .. }
        }
    ));
}

#[test]
fn unknown_keys_are_rejected() {
    let text = format!("{}mirror = \"x\"\n", release("0.1.2", SHA_A));
    let err = Catalogue::from_toml_str(&text).expect_err("unknown key");
    assert!(matches!(err, CatalogueError::Parse(_)));
}

#[test]
fn latest_prefers_last_entry_among_equal_versions() {
    let catalogue = historical();
    let latest = catalogue.latest().expect("latest");
    assert_eq!(latest.manifest().expected_checksum().as_str(), SHA_C);
}

#[rstest]
#[case::latest(None, None, SHA_C)]
#[case::unique_version(Some("0.1.2"), None, SHA_A)]
#[case::version_and_prefix(Some("0.1.6"), Some("bbb"), SHA_B)]
#[case::prefix_only(None, Some("CCC"), SHA_C)]
fn select_resolves_single_release(
    #[case] version: Option<&str>,
    #[case] prefix: Option<&str>,
    #[case] expected_sha: &str,
) {
    let catalogue = historical();
    let selector = ReleaseSelector {
        version: version.map(str::to_owned),
        checksum_prefix: prefix.map(str::to_owned),
    };
    let entry = catalogue.select(&selector).expect("selection");
    assert_eq!(entry.manifest().expected_checksum().as_str(), expected_sha);
}

#[test]
fn select_reports_ambiguous_version() {
    let catalogue = historical();
    let selector = ReleaseSelector {
        version: Some("0.1.6".to_owned()),
        checksum_prefix: None,
    };
    let err = catalogue.select(&selector).expect_err("ambiguous");
    let message = err.to_string();
    assert!(matches!(err, CatalogueError::Ambiguous { .. }));
    assert!(message.contains("bbbbbbbbbbbb"), "message: {message}");
    assert!(message.contains("cccccccccccc"), "message: {message}");
}

#[rstest]
#[case::unknown_version(Some("9.9.9"), None)]
#[case::unknown_prefix(Some("0.1.6"), Some("ddd"))]
fn select_reports_missing_release(#[case] version: Option<&str>, #[case] prefix: Option<&str>) {
    let catalogue = historical();
    let selector = ReleaseSelector {
        version: version.map(str::to_owned),
        checksum_prefix: prefix.map(str::to_owned),
    };
    assert!(matches!(
        catalogue.select(&selector),
        Err(CatalogueError::NotFound { .. })
    ));
}

#[test]
fn select_on_empty_catalogue_fails() {
    let catalogue = Catalogue::from_toml_str("").expect("empty catalogue parses");
    assert!(matches!(
        catalogue.select(&ReleaseSelector::default()),
        Err(CatalogueError::Empty)
    ));
}

#[test]
fn load_reports_missing_file() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().join("missing.toml")).expect("UTF-8 path");
    assert!(matches!(
        Catalogue::load(&path),
        Err(CatalogueError::Read { .. })
    ));
}

#[test]
fn load_reads_catalogue_file() {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().join("releases.toml")).expect("UTF-8 path");
    std::fs::write(&path, release("0.1.2", SHA_A)).expect("write catalogue");
    let catalogue = Catalogue::load(&path).expect("load");
    assert_eq!(catalogue.entries().len(), 1);
}
