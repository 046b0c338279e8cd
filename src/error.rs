//! Error type shared by the table model, aggregation and exporters

use thiserror::Error;

/// Errors raised by table operations
#[derive(Debug, Error)]
pub enum TableError {
    #[error("column already exists: {0}")]
    ColumnAlreadyExists(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("cannot aggregate column {0} over an empty group")]
    EmptyGroup(String),

    #[error("row {row} has no value for column {column}")]
    MissingCell { column: String, row: usize },

    #[error("column {column} holds a non-numeric value: {value}")]
    NotNumeric { column: String, value: String },

    #[error("column {column} mixes values that cannot be compared: {left} and {right}")]
    Incomparable {
        column: String,
        left: String,
        right: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;
