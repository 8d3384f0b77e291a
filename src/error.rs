// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeaturesError>;

#[derive(Error, Debug)]
pub enum FeaturesError {
    /// A required dataset or config file is absent. Fatal, raised before any stage runs.
    #[error("File does not exist: {}", path.display())]
    MissingInput { path: PathBuf },

    /// Delimited text could not be split into tokens.
    /// The dataset layer downgrades this to an empty token set.
    #[error("Malformed {field} text: {text:?}")]
    MalformedRecord { field: &'static str, text: String },

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Matrix serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
