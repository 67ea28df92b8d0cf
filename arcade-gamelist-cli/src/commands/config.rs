use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use arcade_gamelist_lib::settings::{load_settings_string, settings_path};

use crate::CliError;

/// Show the settings file and its contents.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    println!(
        "{}",
        "arcade-gamelist Settings".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    if !path.exists() {
        println!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    println!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        "(exists)".if_supports_color(Stdout, |t| t.green()),
    );
    println!();

    match load_settings_string() {
        Some(contents) => {
            for line in contents.lines() {
                println!("  {line}");
            }
            Ok(())
        }
        None => Err(CliError::config(format!(
            "{} is not valid TOML",
            path.display()
        ))),
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}
