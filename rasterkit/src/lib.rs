//! rasterkit - Image filter engine
//!
//! rasterkit applies pixel-level and neighborhood-level transformations to
//! in-memory raster images. It provides:
//!
//! - Point operations (invert, brightness, contrast, gamma)
//! - Convolution with arbitrary integer kernels and a plain-text kernel
//!   file format
//! - Rank filtering (median, min, max)
//! - Uniform quantization and ordered (Bayer) dithering
//! - RGB <-> HSV conversion with per-plane editing
//!
//! Image container decode/encode (PNG, JPEG, ...) is out of scope: the
//! engine consumes and produces [`PixelBuffer`] values, and every
//! operation returns a new buffer without touching its input.
//!
//! # Example
//!
//! ```
//! use rasterkit::{FilterOp, PixelBuffer, PixelFormat};
//!
//! let image = PixelBuffer::new(64, 64, PixelFormat::Rgb8).unwrap();
//! let blurred = FilterOp::Convolve {
//!     kernel: rasterkit::filter::Kernel::box_blur_3(),
//! }
//! .apply(&image)
//! .unwrap();
//! assert_eq!(blurred.width(), 64);
//! ```

mod ops;

// Re-export core types (the data structures used everywhere)
pub use rasterkit_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use rasterkit_color as color;
pub use rasterkit_filter as filter;

pub use ops::{Error, FilterOp, Result};
