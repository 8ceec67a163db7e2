//! List command implementation.
//!
//! This module provides the `run_list` command handler, which prints the
//! releases of the active catalogue.

use std::io::Write;

use crate::cli::ListArgs;
use crate::config::InstallerConfig;
use crate::error::{InstallerError, Result};
use crate::list_output::{format_human, format_json};
use crate::selection::load_catalogue;

/// Lists the releases in the active catalogue.
///
/// Output is written to stdout (human-readable by default, JSON with `--json`).
///
/// # Errors
///
/// Returns an error if:
/// - The catalogue cannot be read or parsed
/// - Writing to stdout fails
pub fn run_list(args: &ListArgs, config: &InstallerConfig, stdout: &mut dyn Write) -> Result<()> {
    let catalogue = load_catalogue(args.catalogue.as_deref(), config)?;

    let output = if args.json {
        format_json(&catalogue)
    } else {
        format_human(&catalogue)
    };

    writeln!(stdout, "{output}").map_err(|e| InstallerError::WriteFailed { source: e })?;

    Ok(())
}
