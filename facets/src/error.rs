//! FILENAME: facets/src/error.rs

use expr::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacetError {
    #[error("Unknown facet type: {0}")]
    UnknownType(String),

    #[error("Facet configuration has no 'type' member")]
    MissingType,

    #[error("Facet type registered twice: {0}")]
    DuplicateType(String),

    #[error("Facet registry unavailable: {0}")]
    Registry(String),

    #[error("Invalid facet configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FacetResult<T> = Result<T, FacetError>;
