//! CLI argument definitions for the zup installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Install zup release binaries after verifying their checksums.
#[derive(Parser, Debug)]
#[command(name = "zup-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install zup release binaries after verifying their checksums.\n\n",
    "Each release is described by a download URL and a SHA-256 checksum. The ",
    "installer fetches the archive, refuses it if the checksum differs, extracts ",
    "the binary, and places it in the destination directory with executable ",
    "permission.\n\n",
    "Releases are read from a bundled catalogue unless --catalogue or the config ",
    "file names another one, or --url describes a release directly.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the latest catalogued release into ~/.local/bin:\n",
    "    $ zup-installer install\n\n",
    "  Install a specific release into /usr/local/bin:\n",
    "    $ zup-installer install --release 0.1.2 -d /usr/local/bin\n\n",
    "  Install a release that is not in the catalogue:\n",
    "    $ zup-installer install --url https://example.com/zup.tar.gz \\\n",
    "        --sha256 <HEX> --release 0.1.6\n\n",
    "  Check a release archive without installing it:\n",
    "    $ zup-installer verify --release 0.1.2\n\n",
    "  List catalogued releases:\n",
    "    $ zup-installer list\n\n",
    "CONFIGURATION:\n",
    "  <config dir>/zup-installer/config.toml, or the file named by\n",
    "  ZUP_INSTALLER_CONFIG. Keys: destination, catalogue, timeout_secs.",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch, verify, and install a release.
    Install(InstallArgs),

    /// Fetch and verify a release without installing it.
    Verify(VerifyArgs),

    /// List catalogued releases.
    List(ListArgs),
}

/// Flags identifying which release to act on.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseArgs {
    /// Release version to select [default: latest].
    #[arg(long, value_name = "VERSION")]
    pub release: Option<String>,

    /// Leading characters of the archive checksum, when a version has several.
    #[arg(long, value_name = "PREFIX", conflicts_with = "url")]
    pub checksum: Option<String>,

    /// Release catalogue to read instead of the bundled one.
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub catalogue: Option<Utf8PathBuf>,

    /// Archive URL of a release not in the catalogue.
    #[arg(long, value_name = "URL", requires = "sha256", requires = "release")]
    pub url: Option<String>,

    /// Expected SHA-256 of the archive at --url.
    #[arg(long, value_name = "HEX", requires = "url")]
    pub sha256: Option<String>,

    /// Package name for --url [default: zup].
    #[arg(long, value_name = "NAME", requires = "url")]
    pub name: Option<String>,

    /// Archive entry to install for --url [default: the package name].
    #[arg(long, value_name = "PATH", requires = "url")]
    pub binary: Option<String>,
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallArgs {
    /// Release selection.
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Directory to install into [default: config, then platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub destination: Option<Utf8PathBuf>,

    /// Fetch timeout in seconds [default: config, then 30].
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Show what would be installed and exit without fetching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the verify command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyArgs {
    /// Release selection.
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Fetch timeout in seconds [default: config, then 30].
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Release catalogue to read instead of the bundled one.
    #[arg(long, value_name = "FILE")]
    pub catalogue: Option<Utf8PathBuf>,
}

impl Cli {
    /// Return the default log filter implied by `-v` and `-q`.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
