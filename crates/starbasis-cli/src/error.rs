use starbasis::engine::config::ConfigError;
use starbasis::engine::error::BasisError;
use starbasis::io::FieldIoError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Basis(#[from] BasisError),

    #[error(transparent)]
    FieldIo(#[from] FieldIoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Fields differ by {max_diff:.3e}, above the tolerance {tolerance:.3e}")]
    FieldsDiffer { max_diff: f64, tolerance: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
