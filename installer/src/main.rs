//! zup installer CLI entrypoint.
//!
//! This binary fetches a zup release archive, verifies its checksum, and
//! installs the binary it contains.

use clap::Parser;
use std::io::Write;
use zup_installer::cli::{Cli, Command};
use zup_installer::config::load_config;
use zup_installer::dirs::SystemBaseDirs;
use zup_installer::error::Result;
use zup_installer::install_flow::{CommandContext, run_install, run_verify};
use zup_installer::list::run_list;
use zup_installer::output::write_stderr_line;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger` with the level implied by `-v`/`-q`; `RUST_LOG` wins.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let dirs = SystemBaseDirs;
    let config = load_config(&dirs)?;
    let context = CommandContext {
        config: &config,
        dirs: &dirs,
        quiet: cli.quiet,
    };

    match &cli.command {
        Command::Install(args) => run_install(args, context, stdout, stderr),
        Command::Verify(args) => run_verify(args, context, stdout, stderr),
        Command::List(args) => run_list(args, &config, stdout),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
