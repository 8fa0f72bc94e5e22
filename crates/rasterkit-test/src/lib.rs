//! rasterkit-test - Regression test support for the rasterkit workspace
//!
//! Provides the [`RegParams`] comparison accumulator used by the
//! `tests/*_reg.rs` files across the workspace, plus constructors for the
//! synthetic images those tests run the filters on (the engine has no
//! image-file I/O, so test inputs are generated, not loaded).
//!
//! # Usage
//!
//! ```
//! use rasterkit_test::{RegParams, gradient_gray};
//!
//! let mut rp = RegParams::new("example");
//! let pix = gradient_gray(8, 8);
//! rp.compare_values(8.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod params;

pub use params::RegParams;

use rasterkit_core::{PixelBuffer, PixelFormat};

/// Uniform grayscale field.
pub fn uniform_gray(width: u32, height: u32, value: u8) -> PixelBuffer {
    let buf = PixelBuffer::new(width, height, PixelFormat::Gray8).unwrap();
    let mut m = buf.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            m.set_gray_unchecked(x, y, value);
        }
    }
    m.into()
}

/// Uniform RGB field.
pub fn uniform_rgb(width: u32, height: u32, r: u8, g: u8, b: u8) -> PixelBuffer {
    let buf = PixelBuffer::new(width, height, PixelFormat::Rgb8).unwrap();
    let mut m = buf.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            m.set_rgb_unchecked(x, y, r, g, b);
        }
    }
    m.into()
}

/// Diagonal grayscale gradient (deterministic, covers the full byte range
/// on images at least 16 pixels wide).
pub fn gradient_gray(width: u32, height: u32) -> PixelBuffer {
    let buf = PixelBuffer::new(width, height, PixelFormat::Gray8).unwrap();
    let mut m = buf.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            m.set_gray_unchecked(x, y, ((x * 16 + y * 3) % 256) as u8);
        }
    }
    m.into()
}

/// RGB gradient with channels moving along different axes.
pub fn gradient_rgb(width: u32, height: u32) -> PixelBuffer {
    let buf = PixelBuffer::new(width, height, PixelFormat::Rgb8).unwrap();
    let mut m = buf.try_into_mut().unwrap();
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 16) % 256) as u8;
            let g = ((y * 16) % 256) as u8;
            let b = ((x * 8 + y * 8) % 256) as u8;
            m.set_rgb_unchecked(x, y, r, g, b);
        }
    }
    m.into()
}

/// Sample variance over a grayscale buffer (for blur/sharpen assertions).
pub fn gray_variance(buf: &PixelBuffer) -> f64 {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut n = 0u64;
    for y in 0..buf.height() {
        for x in 0..buf.width() {
            let v = (buf.get_pixel_unchecked(x, y) & 0xff) as f64;
            sum += v;
            sum_sq += v * v;
            n += 1;
        }
    }
    if n == 0 {
        return 0.0;
    }
    let mean = sum / n as f64;
    sum_sq / n as f64 - mean * mean
}
