//! Error types for rasterkit-filter
//!
//! Maps the engine's failure taxonomy onto typed variants: kernel
//! validation, kernel-file parsing, I/O, and numeric domain errors are
//! distinct so a caller can react to each (e.g. substitute a built-in
//! kernel on a failed load without masking a bad parameter).

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core buffer error
    #[error("core error: {0}")]
    Core(#[from] rasterkit_core::CoreError),

    /// Kernel fields are structurally inconsistent
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// A kernel file token is missing or not numeric
    #[error("kernel parse error: {0}")]
    Parse(String),

    /// Kernel file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parameter outside the numeric domain of the operation
    #[error("domain error: {0}")]
    Domain(String),

    /// Unsupported pixel format for this operation
    #[error("unsupported pixel format: expected {expected}, got {actual}")]
    UnsupportedFormat {
        /// Expected format description
        expected: &'static str,
        /// Actual format name
        actual: &'static str,
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
