//! Error types for improc-region

use thiserror::Error;

/// Errors that can occur during component labeling
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error (image too small, allocation)
    #[error("core error: {0}")]
    Core(#[from] improc_core::Error),

    /// Error from the connectivity pre-filter
    #[error("morphology error: {0}")]
    Morph(#[from] improc_morph::MorphError),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
