//! arcade-gamelist CLI
//!
//! Command-line interface for turning MAME DAT catalogs and extras into a
//! Batocera gamelist.

mod cli_types;
mod commands;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            paths,
            no_merge,
            dry_run,
        } => commands::convert::run_convert(paths, no_merge, dry_run),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Warnings and errors always show; `--verbose` adds progress and per-entry
/// messages. `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
