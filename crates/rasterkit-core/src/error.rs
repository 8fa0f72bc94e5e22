//! Error types for rasterkit-core
//!
//! A single error enum for buffer construction and access. Each variant
//! carries enough context for diagnostics without exposing internals.

use thiserror::Error;

/// rasterkit-core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid buffer dimensions
    #[error("invalid buffer dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel coordinates out of bounds
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} buffer")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// Buffers that must agree in size do not
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Result type alias for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
