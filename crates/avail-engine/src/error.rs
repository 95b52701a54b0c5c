//! Error types for avail-engine operations.
//!
//! Bad rows in an import file are not errors: they come back as
//! [`ImportIssue`](crate::import::ImportIssue) data. These variants cover
//! caller-supplied arguments and documents that cannot be interpreted at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("No booking window: {0}")]
    NoWindow(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AvailError>;
