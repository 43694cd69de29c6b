//! Error types for the cutting-stock engine.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes surfaced to callers that only need a coarse category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Empty file (-2)
    EmptyFile = -2,
    /// General parse error (-3)
    ParseError = -3,
    /// Invalid dimension or requirement (E100)
    InvalidInput = 100,
    /// No cutting combination reaches the required length (E200)
    NoSolutionFound = 200,
    /// Catalog would become empty (E300)
    CatalogExhaustion = 300,
}

/// Main error type for the estimator.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input for {subject}: {reason}")]
    InvalidInput { subject: String, reason: String },

    #[error("Stock catalog must contain at least one length")]
    EmptyCatalog,

    #[error("Invalid stock length: {length}")]
    InvalidStockLength { length: f64 },

    #[error("Stock length {length} is not in the catalog")]
    StockLengthNotFound { length: f64 },

    #[error("Cannot remove {length}: it is the last stock length in the catalog")]
    CatalogExhaustion { length: f64 },

    #[error("No cutting combination found for {required} m")]
    NoSolutionFound { required: f64 },

    #[error("Project has no rooms and no extra requirements")]
    EmptyProject,

    #[error("Accessory rule '{name}' must have a positive coverage")]
    InvalidAccessoryRule { name: String },
}

impl EstimateError {
    /// Build an `InvalidInput` error.
    pub fn invalid_input(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EstimateError::FileNotFound { .. } => ErrorCode::FileNotFound,
            EstimateError::EmptyFile { .. } => ErrorCode::EmptyFile,
            EstimateError::Json(_) => ErrorCode::ParseError,
            EstimateError::Io(_) => ErrorCode::FileNotFound,
            EstimateError::InvalidInput { .. } => ErrorCode::InvalidInput,
            EstimateError::EmptyCatalog => ErrorCode::InvalidInput,
            EstimateError::InvalidStockLength { .. } => ErrorCode::InvalidInput,
            EstimateError::StockLengthNotFound { .. } => ErrorCode::InvalidInput,
            EstimateError::CatalogExhaustion { .. } => ErrorCode::CatalogExhaustion,
            EstimateError::NoSolutionFound { .. } => ErrorCode::NoSolutionFound,
            EstimateError::EmptyProject => ErrorCode::InvalidInput,
            EstimateError::InvalidAccessoryRule { .. } => ErrorCode::InvalidInput,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for estimator operations.
pub type Result<T> = std::result::Result<T, EstimateError>;
