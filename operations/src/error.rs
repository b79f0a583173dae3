//! FILENAME: operations/src/error.rs

use model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Invalid operation: {0}")]
    Validation(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation record has no 'op' member")]
    MissingOperationType,

    #[error("Operation registered twice: {0}")]
    DuplicateOperation(String),

    #[error("Operation registry unavailable: {0}")]
    Registry(String),

    #[error("Operation failed: {0}")]
    Execution(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Project lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type OperationResult<T> = Result<T, OperationError>;
