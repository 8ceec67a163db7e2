//! Tests for installer CLI parsing and default behaviours.

use super::*;
use clap::error::ErrorKind;
use rstest::rstest;

fn install_args(cli: Cli) -> InstallArgs {
    match cli.command {
        Command::Install(args) => args,
        other => panic!("expected Install command, got {other:?}"),
    }
}

#[test]
fn cli_requires_a_subcommand() {
    let err = Cli::try_parse_from(["zup-installer"]).expect_err("missing subcommand");
    assert!(matches!(
        err.kind(),
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::MissingSubcommand
    ));
}

#[test]
fn install_parses_defaults() {
    let cli = Cli::parse_from(["zup-installer", "install"]);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
    assert_eq!(install_args(cli), InstallArgs::default());
}

#[test]
fn install_parses_release_and_destination() {
    let cli = Cli::parse_from([
        "zup-installer",
        "install",
        "--release",
        "0.1.2",
        "--checksum",
        "22fbae",
        "-d",
        "/usr/local/bin",
    ]);
    let args = install_args(cli);
    assert_eq!(args.release.release.as_deref(), Some("0.1.2"));
    assert_eq!(args.release.checksum.as_deref(), Some("22fbae"));
    assert_eq!(args.destination, Some(Utf8PathBuf::from("/usr/local/bin")));
}

#[test]
fn install_parses_ad_hoc_release() {
    let cli = Cli::parse_from([
        "zup-installer",
        "install",
        "--url",
        "https://example.com/zup.tar.gz",
        "--sha256",
        "abc",
        "--release",
        "0.1.6",
        "--binary",
        "zup-v0.1.6/zup",
    ]);
    let args = install_args(cli);
    assert_eq!(
        args.release.url.as_deref(),
        Some("https://example.com/zup.tar.gz")
    );
    assert_eq!(args.release.binary.as_deref(), Some("zup-v0.1.6/zup"));
}

#[rstest]
#[case::url_without_sha(&["--url", "https://example.com/zup.tar.gz", "--release", "0.1.6"])]
#[case::url_without_release(&["--url", "https://example.com/zup.tar.gz", "--sha256", "abc"])]
#[case::sha_without_url(&["--sha256", "abc"])]
#[case::binary_without_url(&["--binary", "zup"])]
fn ad_hoc_flags_require_each_other(#[case] flags: &[&str]) {
    let argv: Vec<&str> = ["zup-installer", "install"]
        .into_iter()
        .chain(flags.iter().copied())
        .collect();
    let err = Cli::try_parse_from(argv).expect_err("incomplete ad-hoc flags");
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[test]
fn catalogue_conflicts_with_url() {
    let err = Cli::try_parse_from([
        "zup-installer",
        "install",
        "--catalogue",
        "releases.toml",
        "--url",
        "https://example.com/zup.tar.gz",
        "--sha256",
        "abc",
        "--release",
        "0.1.6",
    ])
    .expect_err("conflicting flags");
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn zero_timeout_is_rejected() {
    let err = Cli::try_parse_from(["zup-installer", "install", "--timeout", "0"])
        .expect_err("zero timeout");
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn verify_parses_release() {
    let cli = Cli::parse_from(["zup-installer", "verify", "--release", "0.1.2"]);
    match cli.command {
        Command::Verify(args) => assert_eq!(args.release.release.as_deref(), Some("0.1.2")),
        other => panic!("expected Verify command, got {other:?}"),
    }
}

#[test]
fn list_parses_json_and_catalogue() {
    let cli = Cli::parse_from(["zup-installer", "list", "--json", "--catalogue", "r.toml"]);
    match cli.command {
        Command::List(args) => {
            assert!(args.json);
            assert_eq!(args.catalogue, Some(Utf8PathBuf::from("r.toml")));
        }
        other => panic!("expected List command, got {other:?}"),
    }
}

#[rstest]
#[case::default(&[], log::LevelFilter::Warn)]
#[case::one(&["-v"], log::LevelFilter::Info)]
#[case::two(&["-vv"], log::LevelFilter::Debug)]
#[case::many(&["-vvvv"], log::LevelFilter::Trace)]
#[case::quiet(&["-q"], log::LevelFilter::Error)]
fn verbosity_maps_to_log_level(#[case] flags: &[&str], #[case] expected: log::LevelFilter) {
    let argv: Vec<&str> = ["zup-installer", "list"]
        .into_iter()
        .chain(flags.iter().copied())
        .collect();
    let cli = Cli::parse_from(argv);
    assert_eq!(cli.log_level(), expected);
}

#[test]
fn verbose_and_quiet_conflict() {
    let err = Cli::try_parse_from(["zup-installer", "list", "-v", "-q"]).expect_err("conflict");
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}
