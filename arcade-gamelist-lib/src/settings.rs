//! Optional settings file with default paths.
//!
//! The file lives at `~/.config/arcade-gamelist/settings.toml`:
//!
//! ```toml
//! [paths]
//! dat_zip = "/userdata/bios/mame/dats"
//! extras_dir = "/userdata/bios/mame/extras"
//! roms_dir = "/userdata/roms/mame"
//! ```
//!
//! Command-line arguments always take precedence over these values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub dat_zip: Option<PathBuf>,
    pub extras_dir: Option<PathBuf>,
    pub roms_dir: Option<PathBuf>,
    pub extract_temp: Option<PathBuf>,
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("arcade-gamelist").join("settings.toml")
}

/// Load the settings file at [`settings_path`].
pub fn load_settings() -> Result<Settings, PipelineError> {
    load_settings_from(&settings_path())
}

/// Load settings from `path`. A missing file yields the defaults; a file
/// that exists but doesn't parse is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings, PipelineError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents)
        .map_err(|e| PipelineError::settings(format!("{}: {e}", path.display())))
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
