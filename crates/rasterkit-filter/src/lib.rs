//! rasterkit-filter - Kernel and window filters
//!
//! This crate provides the neighborhood and per-pixel filters of the
//! rasterkit engine:
//!
//! - Convolution with arbitrary integer kernels ([`convolve`]), including
//!   the classic named kernels (box blur, Gaussian, sharpen, edge detect,
//!   emboss)
//! - The [`Kernel`] value type with its plain-text persistence format
//! - Rank filtering ([`rank`]): median, min, max
//! - Point operations ([`point`]): invert, brightness, contrast, gamma

pub mod convolve;
mod error;
pub mod kernel;
pub mod point;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

// Re-export commonly used functions
pub use convolve::{blur, convolve, convolve_color, convolve_gray, edge_detect, emboss,
    gaussian_blur, sharpen};
pub use point::{adjust_brightness, adjust_contrast, gamma_correct, invert, map_channels};
pub use rank::{max_filter, median_filter, min_filter, rank_filter, rank_filter_color,
    rank_filter_gray};
