//! Error types for twas_atlas

use thiserror::Error;

/// Main error type for atlas operations
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("Chromosome '{chromosome}' has no block in the genome layout")]
    UnknownChromosome { chromosome: String },

    #[error("Invalid significance threshold: {value} (must be finite and > 0)")]
    InvalidThreshold { value: f64 },

    #[error("Invalid position table: {reason}")]
    InvalidPositionTable { reason: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;
