//! rasterkit-color - Color processing for the rasterkit filter engine
//!
//! This crate provides the color-oriented operations:
//!
//! - **Color space conversion** ([`colorspace`]): RGB <-> HSV with
//!   byte-packed channels, HSV channel extraction, and recombination of
//!   independently edited H/S/V planes
//! - **Quantization** ([`quantize`]): uniform per-channel level reduction
//!   and ordered (Bayer) dithering with recursively generated threshold
//!   maps

pub mod colorspace;
pub mod error;
pub mod quantize;

// Re-export core types
pub use rasterkit_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export color space types and functions
pub use colorspace::{
    // Types
    Hsv8,
    HsvChannel,
    // Pixel-level conversions
    hsv_to_rgb,
    rgb_to_hsv,
    // Buffer-level conversions
    extract_channel,
    hsv_buffer_to_rgb,
    hsv_planes_to_rgb,
    rgb_buffer_to_hsv,
};

// Re-export quantization functions
pub use quantize::{ThresholdMap, ordered_dither, uniform_quantize};
