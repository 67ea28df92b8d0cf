use thiserror::Error;

use arcade_gamelist_lib::PipelineError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Missing or malformed configuration
    #[error("Config error: {0}")]
    Config(String),

    /// The conversion itself failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
