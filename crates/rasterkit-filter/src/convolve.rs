//! Convolution engine
//!
//! One sliding-window engine for every kernel-driven filter. For each
//! output pixel the kernel grid is laid over the source with its anchor
//! cell on the pixel; samples outside the image are clamped to the nearest
//! edge pixel (replicate border), so output dimensions always equal input
//! dimensions. Channels accumulate independently in integer arithmetic and
//! the final value is `clamp(round(sum / divisor) + offset, 0, 255)`.

use crate::{FilterError, FilterResult, Kernel};
use rasterkit_core::{PixelBuffer, PixelFormat, color};

/// Convolve a buffer with a kernel (dispatches on pixel format).
///
/// # Errors
///
/// Returns [`FilterError::Domain`] when the kernel's divisor is 0.
pub fn convolve(buf: &PixelBuffer, kernel: &Kernel) -> FilterResult<PixelBuffer> {
    match buf.format() {
        PixelFormat::Gray8 => convolve_gray(buf, kernel),
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => convolve_color(buf, kernel),
    }
}

/// Convolve an 8-bit grayscale buffer with a kernel.
pub fn convolve_gray(buf: &PixelBuffer, kernel: &Kernel) -> FilterResult<PixelBuffer> {
    check_gray(buf)?;
    check_divisor(kernel)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0i64;
            for_each_sample(buf, kernel, x, y, |word, coeff| {
                sum += (word & 0xff) as i64 * coeff as i64;
            });
            out_mut.set_gray_unchecked(x, y, scale(sum, kernel));
        }
    }

    Ok(out_mut.into())
}

/// Convolve an RGB(A) buffer with a kernel, each channel independently.
///
/// Alpha is convolved like the color channels; for an `Rgb8` buffer the
/// constant 255 alpha plane stays 255 under any kernel whose divisor
/// equals its coefficient sum, and clamps back to [0, 255] otherwise.
pub fn convolve_color(buf: &PixelBuffer, kernel: &Kernel) -> FilterResult<PixelBuffer> {
    check_color(buf)?;
    check_divisor(kernel)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let mut sum_r = 0i64;
            let mut sum_g = 0i64;
            let mut sum_b = 0i64;
            let mut sum_a = 0i64;
            for_each_sample(buf, kernel, x, y, |word, coeff| {
                let (r, g, b, a) = color::extract_rgba(word);
                let k = coeff as i64;
                sum_r += r as i64 * k;
                sum_g += g as i64 * k;
                sum_b += b as i64 * k;
                sum_a += a as i64 * k;
            });
            out_mut.set_rgba_unchecked(
                x,
                y,
                scale(sum_r, kernel),
                scale(sum_g, kernel),
                scale(sum_b, kernel),
                scale(sum_a, kernel),
            );
        }
    }

    Ok(out_mut.into())
}

/// Visit every kernel cell's edge-clamped source sample for output (x, y).
#[inline]
fn for_each_sample(
    buf: &PixelBuffer,
    kernel: &Kernel,
    x: u32,
    y: u32,
    mut visit: impl FnMut(u32, i32),
) {
    let w = buf.width() as i64;
    let h = buf.height() as i64;
    let anchor_row = kernel.anchor_row() as i64;
    let anchor_col = kernel.anchor_col() as i64;
    let coeffs = kernel.coefficients();
    let cols = kernel.cols();

    for ky in 0..kernel.rows() {
        let sy = (y as i64 + ky as i64 - anchor_row).clamp(0, h - 1) as u32;
        for kx in 0..cols {
            let sx = (x as i64 + kx as i64 - anchor_col).clamp(0, w - 1) as u32;
            let coeff = coeffs[(ky * cols + kx) as usize];
            visit(buf.get_pixel_unchecked(sx, sy), coeff);
        }
    }
}

/// `clamp(round(sum / divisor) + offset, 0, 255)`.
///
/// Rounding is half-away-from-zero on the real quotient.
#[inline]
fn scale(sum: i64, kernel: &Kernel) -> u8 {
    let scaled = (sum as f64 / kernel.divisor() as f64).round() as i64;
    (scaled + kernel.offset() as i64).clamp(0, 255) as u8
}

fn check_divisor(kernel: &Kernel) -> FilterResult<()> {
    if kernel.divisor() == 0 {
        return Err(FilterError::Domain("kernel divisor must be nonzero".into()));
    }
    Ok(())
}

fn check_gray(buf: &PixelBuffer) -> FilterResult<()> {
    if buf.format() != PixelFormat::Gray8 {
        return Err(FilterError::UnsupportedFormat {
            expected: "gray8",
            actual: buf.format().name(),
        });
    }
    Ok(())
}

fn check_color(buf: &PixelBuffer) -> FilterResult<()> {
    if !buf.format().is_color() {
        return Err(FilterError::UnsupportedFormat {
            expected: "rgb8 or rgba8",
            actual: buf.format().name(),
        });
    }
    Ok(())
}

// --- Named-kernel wrappers ----------------------------------------------

/// Apply the 3x3 box blur.
pub fn blur(buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
    convolve(buf, &Kernel::box_blur_3())
}

/// Apply the 5x5 Gaussian blur.
pub fn gaussian_blur(buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
    convolve(buf, &Kernel::gaussian_5())
}

/// Apply the 3x3 sharpen kernel.
pub fn sharpen(buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
    convolve(buf, &Kernel::sharpen_3())
}

/// Apply the 3x3 Laplacian edge detector.
pub fn edge_detect(buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
    convolve(buf, &Kernel::edge_detect_3())
}

/// Apply the 3x3 emboss kernel (offset 128).
pub fn emboss(buf: &PixelBuffer) -> FilterResult<PixelBuffer> {
    convolve(buf, &Kernel::emboss_3())
}
