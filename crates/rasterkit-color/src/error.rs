//! Error types for rasterkit-color

use thiserror::Error;

/// Errors that can occur during color processing operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core buffer error
    #[error("core error: {0}")]
    Core(#[from] rasterkit_core::CoreError),

    /// Unsupported pixel format for this operation
    #[error("unsupported pixel format: expected {expected}, got {actual}")]
    UnsupportedFormat {
        expected: &'static str,
        actual: &'static str,
    },

    /// Threshold maps exist only for sizes 2, 3 and even multiples
    #[error("unsupported threshold map size: {0}")]
    UnsupportedMapSize(u32),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
