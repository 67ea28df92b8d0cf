use thiserror::Error;

use arcade_gamelist_dat::DatError;
use arcade_gamelist_frontend::FrontendError;

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No usable ROM catalog archive next to / inside the given path
    #[error("Could not find ROM DAT file in {0}")]
    MissingRomCatalog(String),

    /// I/O error outside the recoverable per-source steps
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DAT error: {0}")]
    Dat(#[from] DatError),

    #[error("Gamelist error: {0}")]
    Frontend(#[from] FrontendError),

    /// Malformed settings file
    #[error("Settings error: {0}")]
    Settings(String),
}

impl PipelineError {
    pub fn missing_rom_catalog(location: impl Into<String>) -> Self {
        Self::MissingRomCatalog(location.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
