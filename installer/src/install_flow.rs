//! Install and verify command handlers.
//!
//! These keep manifest resolution, progress reporting, and result printing
//! separate from CLI orchestration in `main.rs`. Each handler has a `_with`
//! variant taking the fetcher, so the flows run in tests without network
//! access.

use std::io::Write;
use std::time::Duration;

use crate::artefact::extraction::ArchiveFormatExtractor;
use crate::artefact::fetch::{ArtefactFetcher, HttpFetcher};
use crate::cli::{InstallArgs, VerifyArgs};
use crate::config::InstallerConfig;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::installer::{install_with, verify_with};
use crate::output::{DryRunInfo, success_message, verified_message, write_stderr_line};
use crate::selection::{resolve_destination, resolve_manifest};

/// Shared inputs of the install and verify commands.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    /// Loaded configuration file.
    pub config: &'a InstallerConfig,
    /// Base directory provider.
    pub dirs: &'a dyn BaseDirs,
    /// Whether progress output is suppressed.
    pub quiet: bool,
}

/// Return the fetch timeout: CLI flag, then config, then the default.
#[must_use]
pub fn effective_timeout(cli_timeout: Option<u64>, config: &InstallerConfig) -> Duration {
    cli_timeout.map_or_else(|| config.timeout(), Duration::from_secs)
}

/// Install the selected release over HTTP.
///
/// # Errors
///
/// Returns an error if the release cannot be resolved, installation fails,
/// or the installed path cannot be written to stdout.
pub fn run_install(
    args: &InstallArgs,
    context: CommandContext<'_>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let fetcher = HttpFetcher::new(effective_timeout(args.timeout, context.config));
    run_install_with(args, context, &fetcher, stdout, stderr)
}

/// Install the selected release using `fetcher`.
///
/// Prints the installed path on stdout. With `--dry-run`, prints what would
/// be installed to stderr and returns without fetching.
///
/// # Errors
///
/// See [`run_install`].
pub fn run_install_with(
    args: &InstallArgs,
    context: CommandContext<'_>,
    fetcher: &dyn ArtefactFetcher,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let manifest = resolve_manifest(&args.release, context.config)?;
    let destination = resolve_destination(
        args.destination.as_deref(),
        context.config,
        context.dirs,
    )?;

    if args.dry_run {
        let info = DryRunInfo {
            manifest: &manifest,
            destination_dir: &destination,
            timeout: effective_timeout(args.timeout, context.config),
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    if !context.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Installing {} from {}...",
                manifest.label(),
                manifest.source_url()
            ),
        );
    }

    let installed = install_with(
        &manifest,
        &destination,
        fetcher,
        &ArchiveFormatExtractor,
    )?;

    if !context.quiet {
        write_stderr_line(stderr, success_message(&manifest, installed.as_path()));
    }
    writeln!(stdout, "{installed}").map_err(|e| InstallerError::WriteFailed { source: e })?;
    Ok(())
}

/// Fetch and verify the selected release over HTTP.
///
/// # Errors
///
/// Returns an error if the release cannot be resolved, the fetch or
/// checksum comparison fails, or stdout cannot be written.
pub fn run_verify(
    args: &VerifyArgs,
    context: CommandContext<'_>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let fetcher = HttpFetcher::new(effective_timeout(args.timeout, context.config));
    run_verify_with(args, context, &fetcher, stdout, stderr)
}

/// Fetch and verify the selected release using `fetcher`.
///
/// Prints the verified digest on stdout.
///
/// # Errors
///
/// See [`run_verify`].
pub fn run_verify_with(
    args: &VerifyArgs,
    context: CommandContext<'_>,
    fetcher: &dyn ArtefactFetcher,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let manifest = resolve_manifest(&args.release, context.config)?;
    if !context.quiet {
        write_stderr_line(
            stderr,
            format!(
                "Verifying {} from {}...",
                manifest.label(),
                manifest.source_url()
            ),
        );
    }

    let digest = verify_with(&manifest, fetcher)?;

    if !context.quiet {
        write_stderr_line(stderr, verified_message(&manifest));
    }
    writeln!(stdout, "{digest}").map_err(|e| InstallerError::WriteFailed { source: e })?;
    Ok(())
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
