//! Error types for improc-core
//!
//! Provides a unified error type for the image containers and the
//! pack/unpack conversions. Each variant carries enough context for
//! diagnostics without exposing buffer internals.

use thiserror::Error;

/// improc core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Zero-sized image
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Image below the minimum size accepted by morphology and labeling
    #[error("image too small: {width}x{height}, minimum is {min_width}x{min_height}")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two images that must match in size do not
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Element type not supported by this operation
    #[error("unsupported image type: expected {expected}, got {actual}")]
    UnsupportedType {
        expected: &'static str,
        actual: &'static str,
    },

    /// Raw buffer length does not match the image geometry
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Memory allocation failed
    #[error("memory allocation failed")]
    AllocationFailed,
}

/// Result type alias for improc core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Allocate a buffer of `len` default-initialized elements.
///
/// Reports [`Error::AllocationFailed`] instead of aborting when the
/// allocator refuses the request.
pub fn try_alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed)?;
    buf.resize(len, T::default());
    Ok(buf)
}
