use crate::types::RowLabel;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PurgecvError {
    #[error("Insufficient rows: need at least {required} (n_bars + 1), got {actual}")]
    InsufficientRows { required: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Degenerate fold {fold}: {reason}")]
    DegenerateFold { fold: usize, reason: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid row index: {0}")]
    InvalidIndex(String),

    #[error("Row label not found: {0}")]
    LabelNotFound(RowLabel),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, PurgecvError>;
