use thiserror::Error;

#[derive(Error, Debug)]
pub enum StonestreetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Mapping file error: {0}")]
    Mapping(#[from] serde_json::Error),

    #[error("Ledger is missing required column: {0}")]
    MissingColumn(String),

    #[error("Mapping description and label must both be non-empty")]
    EmptyMapping,

    #[error("Unknown mapping: {0}")]
    UnknownMapping(String),

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StonestreetError>;
