//! Filter selection and dispatch
//!
//! [`FilterOp`] is the value a caller builds from user input (a menu
//! choice, a request payload) to name one filter invocation together with
//! its parameters. [`FilterOp::apply`] runs it against a buffer and
//! returns the new output buffer; parameter validation happens inside the
//! selected operation, before any pixel is produced.

use rasterkit_color::{ColorError, ordered_dither, uniform_quantize};
use rasterkit_core::PixelBuffer;
use rasterkit_filter::{FilterError, Kernel};
use thiserror::Error;

/// Any rasterkit error.
#[derive(Debug, Error)]
pub enum Error {
    /// Core buffer error
    #[error(transparent)]
    Core(#[from] rasterkit_core::CoreError),

    /// Filtering error
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Color processing error
    #[error(transparent)]
    Color(#[from] ColorError),
}

/// Result alias for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// One filter invocation: the operation plus its parameters.
#[derive(Debug, Clone)]
pub enum FilterOp {
    /// Invert every channel.
    Invert,
    /// Add `delta` to every channel, clamped.
    Brightness { delta: i32 },
    /// Contrast curve around mid-gray; `contrast` must not be 259.
    Contrast { contrast: f64 },
    /// Gamma correction; `gamma` must be positive.
    Gamma { gamma: f64 },
    /// Convolve with a kernel (built-in or loaded from a kernel file).
    Convolve { kernel: Kernel },
    /// Median filter over a `window x window` neighborhood.
    Median { window: u32 },
    /// Collapse each channel to evenly spaced levels.
    UniformQuantize {
        levels_r: u32,
        levels_g: u32,
        levels_b: u32,
    },
    /// Ordered dithering with the threshold map for `map_size`.
    OrderedDither { map_size: u32, levels: u32 },
}

impl FilterOp {
    /// Run this operation, producing a new buffer.
    ///
    /// The input is never modified; failed parameter validation rejects
    /// the whole operation before any output pixel is written.
    pub fn apply(&self, buf: &PixelBuffer) -> Result<PixelBuffer> {
        match self {
            FilterOp::Invert => Ok(rasterkit_filter::invert(buf)),
            FilterOp::Brightness { delta } => Ok(rasterkit_filter::adjust_brightness(buf, *delta)),
            FilterOp::Contrast { contrast } => {
                Ok(rasterkit_filter::adjust_contrast(buf, *contrast)?)
            }
            FilterOp::Gamma { gamma } => Ok(rasterkit_filter::gamma_correct(buf, *gamma)?),
            FilterOp::Convolve { kernel } => Ok(rasterkit_filter::convolve(buf, kernel)?),
            FilterOp::Median { window } => Ok(rasterkit_filter::median_filter(buf, *window)?),
            FilterOp::UniformQuantize {
                levels_r,
                levels_g,
                levels_b,
            } => Ok(uniform_quantize(buf, *levels_r, *levels_g, *levels_b)),
            FilterOp::OrderedDither { map_size, levels } => {
                Ok(ordered_dither(buf, *map_size, *levels)?)
            }
        }
    }
}
