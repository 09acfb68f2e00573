//! Error types for bookstore operations

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for catalog operations
#[derive(Debug, Error)]
pub enum BookstoreError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),
    /// No live record with this identifier
    #[error("Book not found: {0}")]
    NotFound(i64),
    /// Purchase count was zero or negative
    #[error("Transaction count must be greater than zero!")]
    NonPositiveCount(i64),
    /// Purchase count exceeds the remaining stock
    #[error("Not enough stock!")]
    NotEnoughStock { book_id: i64, requested: i64 },
    /// Command argument was not an integer
    #[error("Parameters must be in correct type!")]
    InvalidArgument(String),
    /// Seed file could not be opened
    #[error("Unable to open seed file {path}: {source}")]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Seed file is structurally malformed (wrong column count, bad quoting)
    #[error("Unable to read csv data: {0}")]
    Csv(#[from] csv::Error),
}

/// Result alias for bookstore operations
pub type Result<T> = std::result::Result<T, BookstoreError>;
