use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use arcade_gamelist_lib::settings::{PathSettings, load_settings_from, settings_path};
use arcade_gamelist_lib::{ConvertOptions, ConvertSummary, Converter, PipelineError};

use crate::CliError;
use crate::cli_types::PathArgs;

/// Run the convert command.
pub(crate) fn run_convert(args: PathArgs, no_merge: bool, dry_run: bool) -> Result<(), CliError> {
    let defaults = load_path_defaults(&settings_path())?;
    let mut options = resolve_options(args, defaults)?;
    options.no_merge = no_merge;
    options.dry_run = dry_run;

    log::info!("DAT source: {}", options.dat_path.display());
    log::info!("Extras: {}", options.extras_dir.display());
    log::info!("ROM directory: {}", options.roms_dir.display());
    if dry_run {
        log::info!("Dry run: no files will be written");
    }
    if no_merge {
        log::info!("Merging with the existing gamelist is disabled");
    }

    let summary = Converter::new(options).run()?;
    print_summary(&summary);
    Ok(())
}

/// The `[paths]` table of the settings file at `path`. Any problem reading
/// it is a configuration error.
fn load_path_defaults(path: &Path) -> Result<PathSettings, CliError> {
    match load_settings_from(path) {
        Ok(settings) => Ok(settings.paths),
        Err(PipelineError::Settings(msg)) => Err(CliError::config(msg)),
        Err(e) => Err(CliError::config(format!("{}: {e}", path.display()))),
    }
}

/// Command-line paths win; the settings file fills the gaps.
fn resolve_options(args: PathArgs, defaults: PathSettings) -> Result<ConvertOptions, CliError> {
    let dat_path = require(args.dat_zip.or(defaults.dat_zip), "--dat-zip", "dat_zip")?;
    let extras_dir = require(
        args.extras_dir.or(defaults.extras_dir),
        "--extras-dir",
        "extras_dir",
    )?;
    let roms_dir = require(args.roms_dir.or(defaults.roms_dir), "--roms-dir", "roms_dir")?;

    let mut options = ConvertOptions::new(dat_path, extras_dir, roms_dir);
    options.extract_temp = args.extract_temp.or(defaults.extract_temp);
    Ok(options)
}

fn require(value: Option<PathBuf>, flag: &str, key: &str) -> Result<PathBuf, CliError> {
    value.ok_or_else(|| {
        CliError::config(format!(
            "{flag} was not given and paths.{key} is not set in {}",
            settings_path().display()
        ))
    })
}

fn print_summary(summary: &ConvertSummary) {
    if summary.written {
        println!(
            "{} Wrote {} games to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.total_games,
            summary
                .gamelist_path
                .display()
                .if_supports_color(Stdout, |t| t.cyan()),
        );
    } else {
        println!(
            "{} Dry run: would write {} games to {}",
            "\u{2139}".if_supports_color(Stdout, |t| t.yellow()),
            summary.total_games,
            summary
                .gamelist_path
                .display()
                .if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    println!(
        "  {} {} ROM, {} CHD, {} artwork ({} merged)",
        "Machines:".if_supports_color(Stdout, |t| t.dimmed()),
        summary.rom_machines,
        summary.chd_machines,
        summary.artwork_machines,
        summary.merged_machines,
    );
    println!(
        "  {} {} screenshots, {} covers, {} marquees",
        "Media:".if_supports_color(Stdout, |t| t.dimmed()),
        summary.screenshots,
        summary.covers,
        summary.marquees,
    );
    if summary.preserved_orphans > 0 {
        println!(
            "  {} {} existing games not in any DAT",
            "Kept:".if_supports_color(Stdout, |t| t.dimmed()),
            summary.preserved_orphans,
        );
    }
}
