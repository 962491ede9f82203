//! Error types for improc-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error (image too small, size mismatch, allocation)
    #[error("core error: {0}")]
    Core(#[from] improc_core::Error),

    /// Iteration count below 1
    #[error("invalid iteration count: {0}, must be at least 1")]
    InvalidIterations(u32),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
