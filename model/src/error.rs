//! FILENAME: model/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown recon id: {0}")]
    UnknownRecon(String),

    #[error("Invalid recon id: {0}")]
    InvalidReconId(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
