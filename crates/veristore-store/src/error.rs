//! Error types for the storage layer.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("record {id} already exists in {table}")]
    Duplicate { table: String, id: String },

    #[error("{table} already holds version {sequence_number} of {prefix}")]
    Conflict {
        table: String,
        prefix: String,
        sequence_number: u64,
    },

    #[error("invalid table name {0:?}")]
    InvalidTable(String),

    #[error("invalid column name {0:?}")]
    InvalidColumn(String),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("background task failed: {0}")]
    Background(String),
}
