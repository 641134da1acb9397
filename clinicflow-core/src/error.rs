//! Error types for clinicflow-core

use thiserror::Error;

/// Main error type for the clinicflow-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level read or write failure in the record store
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store error
    #[error("record store error: {0}")]
    Store(String),

    /// The store was modified between read and write
    #[error("record store changed since it was read: {path}")]
    StoreConflict { path: String },
}

/// Result type alias for clinicflow-core
pub type Result<T> = std::result::Result<T, Error>;
