//! Error types for the test helpers

use thiserror::Error;

/// Errors that can occur while building test inputs
#[derive(Debug, Error)]
pub enum TestError {
    /// Image construction failed
    #[error("image error: {0}")]
    Image(#[from] improc_core::Error),

    /// A text pattern could not be parsed
    #[error("bad pattern at row {row}: {message}")]
    Pattern { row: usize, message: String },

    /// Invalid builder argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for test helper operations
pub type TestResult<T> = Result<T, TestError>;
