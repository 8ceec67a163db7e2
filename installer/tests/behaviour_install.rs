//! Behaviour-driven tests for checksum-verified installation.
//!
//! These scenarios drive `install_with` end to end with real archives served
//! by a stub fetcher, covering success, integrity, extraction, and fetch
//! failures.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::path::PathBuf;
use tempfile::TempDir;
use zup_installer::artefact::extraction::ArchiveFormatExtractor;
use zup_installer::error::InstallError;
use zup_installer::installer::{InstalledPath, install_with};
use zup_installer::manifest::package_manifest::PackageManifest;
use zup_installer::test_utils::{
    StubFetcher, StubResponse, sha256_hex, tar_gz_archive, tar_zst_archive, zip_archive,
    zup_manifest,
};

const BINARY: &[u8] = b"\x7fELF zup 0.1.6";
const RELEASE_BASE: &str = "https://github.com/devglyph1/homebrew-zup/releases/download/v0.1.6";

struct InstallWorld {
    temp_dir: TempDir,
    format: String,
    archive: Vec<u8>,
    response: Option<StubResponse>,
    manifest: Option<PackageManifest>,
    result: Option<Result<InstalledPath, InstallError>>,
}

impl InstallWorld {
    fn destination(&self) -> PathBuf {
        self.temp_dir.path().join("bin")
    }

    fn install(&mut self) {
        let manifest = self.manifest.as_ref().expect("manifest set");
        let response = self
            .response
            .clone()
            .unwrap_or_else(|| StubResponse::Body(self.archive.clone()));
        let fetcher = StubFetcher::new(response);
        let result = install_with(
            manifest,
            &self.destination(),
            &fetcher,
            &ArchiveFormatExtractor,
        );
        self.result = Some(result);
    }

    fn installed(&self) -> &InstalledPath {
        match self.result.as_ref().expect("result set") {
            Ok(installed) => installed,
            Err(err) => panic!("expected success, got {err}"),
        }
    }
}

#[fixture]
fn world() -> InstallWorld {
    InstallWorld {
        temp_dir: tempfile::tempdir().expect("temp dir"),
        format: "tar.gz".to_owned(),
        archive: Vec::new(),
        response: None,
        manifest: None,
        result: None,
    }
}

fn build_archive(format: &str, entry: &str) -> Vec<u8> {
    let entries: &[(&str, &[u8])] = &[(entry, BINARY)];
    match format {
        "tar.gz" => tar_gz_archive(entries),
        "tar.zst" => tar_zst_archive(entries),
        "zip" => zip_archive(entries),
        other => panic!("unsupported test format {other}"),
    }
    .expect("build archive")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a release archive containing \"{entry}\"")]
fn given_release_archive(world: &mut InstallWorld, entry: String) {
    world.archive = build_archive(&world.format, &entry);
}

#[given("a \"{format}\" release archive containing \"{entry}\"")]
fn given_formatted_release_archive(world: &mut InstallWorld, format: String, entry: String) {
    world.archive = build_archive(&format, &entry);
    world.format = format;
}

#[given("a manifest whose checksum matches the archive")]
fn given_matching_manifest(world: &mut InstallWorld) {
    let url = format!("{RELEASE_BASE}/zup.{}", world.format);
    let manifest =
        zup_manifest(&url, &sha256_hex(&world.archive), "0.1.6", "zup").expect("manifest");
    world.manifest = Some(manifest);
}

#[given("the served archive has one byte changed")]
fn given_tampered_archive(world: &mut InstallWorld) {
    let mut tampered = world.archive.clone();
    let middle = tampered.len() / 2;
    if let Some(byte) = tampered.get_mut(middle) {
        *byte = byte.wrapping_add(1);
    }
    world.response = Some(StubResponse::Body(tampered));
}

#[given("the release server is unreachable")]
fn given_unreachable_server(world: &mut InstallWorld) {
    world.response = Some(StubResponse::Unreachable("connection refused".to_owned()));
}

#[when("the release is installed into a temporary destination")]
fn when_installed(world: &mut InstallWorld) {
    world.install();
}

#[when("the release is installed again")]
fn when_installed_again(world: &mut InstallWorld) {
    world.install();
}

#[then("the install succeeds")]
fn then_install_succeeds(world: &mut InstallWorld) {
    let _ = world.installed();
}

#[then("the installed file is named \"{name}\"")]
fn then_installed_file_named(world: &mut InstallWorld, name: String) {
    let installed = world.installed();
    assert_eq!(installed.as_path(), world.destination().join(name));
}

#[then("the installed file matches the archive copy")]
fn then_installed_matches(world: &mut InstallWorld) {
    let bytes = std::fs::read(world.installed().as_path()).expect("read installed file");
    assert_eq!(bytes, BINARY);
}

#[then("the installed file is executable")]
fn then_installed_executable(world: &mut InstallWorld) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(world.installed().as_path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
    #[cfg(not(unix))]
    let _ = world.installed();
}

#[then("the install fails with \"{kind}\"")]
fn then_install_fails(world: &mut InstallWorld, kind: String) {
    match world.result.as_ref().expect("result set") {
        Ok(installed) => panic!("expected {kind}, installed {installed}"),
        Err(err) => {
            assert_eq!(err.kind().to_string(), kind);
            assert!(
                err.to_string().contains("zup 0.1.6"),
                "message should name the release: {err}"
            );
        }
    }
}

#[then("the destination directory is not created")]
fn then_destination_absent(world: &mut InstallWorld) {
    assert!(
        !world.destination().exists(),
        "destination should not exist: {}",
        world.destination().display()
    );
}

#[then("the destination holds only the installed file")]
fn then_destination_single_file(world: &mut InstallWorld) {
    let names: Vec<String> = std::fs::read_dir(world.destination())
        .expect("read destination")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["zup".to_owned()]);
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Install a verified release"
)]
fn scenario_install_verified_release(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Install from a zstd-compressed release"
)]
fn scenario_install_tar_zst(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Install from a zip release"
)]
fn scenario_install_zip(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Binary nested under a versioned directory"
)]
fn scenario_nested_binary(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Tampered archive is rejected"
)]
fn scenario_tampered_archive(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Archive without the binary is rejected"
)]
fn scenario_missing_binary(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Network failure is reported"
)]
fn scenario_network_failure(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/artefact_install.feature",
    name = "Reinstalling overwrites the previous binary"
)]
fn scenario_reinstall(world: InstallWorld) {
    let _ = world;
}
