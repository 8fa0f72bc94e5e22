//! Rank (order-statistic) filters
//!
//! Median, min, and max filters as special cases of a generic rank filter.
//! For each output pixel the `window x window` edge-clamped neighborhood is
//! gathered per channel, sorted, and the element at the rank's selection
//! index is taken. The selection index for rank `r` is
//! `min(floor(r * count), count - 1)`; at rank 0.5 this is `count / 2`,
//! the upper median (no averaging for even windows).

use crate::{FilterError, FilterResult};
use rasterkit_core::{PixelBuffer, PixelFormat, color};

/// Apply a rank filter (dispatches on pixel format).
///
/// # Arguments
///
/// * `buf` - Input buffer
/// * `window` - Side length of the square neighborhood; >= 1, typically
///   odd. The window is anchored at cell `(window/2, window/2)`.
/// * `rank` - Selection rank in [0.0, 1.0]: 0.0 = min, 0.5 = median,
///   1.0 = max
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] for `window == 0` or a rank
/// outside [0.0, 1.0].
pub fn rank_filter(buf: &PixelBuffer, window: u32, rank: f64) -> FilterResult<PixelBuffer> {
    match buf.format() {
        PixelFormat::Gray8 => rank_filter_gray(buf, window, rank),
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => rank_filter_color(buf, window, rank),
    }
}

/// Rank filter over an 8-bit grayscale buffer.
pub fn rank_filter_gray(buf: &PixelBuffer, window: u32, rank: f64) -> FilterResult<PixelBuffer> {
    check_gray(buf)?;
    let select = selection_index(window, rank)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    let count = (window * window) as usize;
    let mut values: Vec<u8> = Vec::with_capacity(count);

    for y in 0..h {
        for x in 0..w {
            values.clear();
            for_each_neighbor(buf, window, x, y, |word| {
                values.push((word & 0xff) as u8);
            });
            values.sort_unstable();
            out_mut.set_gray_unchecked(x, y, values[select]);
        }
    }

    Ok(out_mut.into())
}

/// Rank filter over an RGB(A) buffer, each channel independently.
///
/// The channels of an output pixel are selected independently, so the
/// output color need not appear anywhere in the input window. Alpha is
/// ranked like the other channels (constant 255 for `Rgb8` stays 255).
pub fn rank_filter_color(buf: &PixelBuffer, window: u32, rank: f64) -> FilterResult<PixelBuffer> {
    check_color(buf)?;
    let select = selection_index(window, rank)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    let count = (window * window) as usize;
    let mut reds: Vec<u8> = Vec::with_capacity(count);
    let mut greens: Vec<u8> = Vec::with_capacity(count);
    let mut blues: Vec<u8> = Vec::with_capacity(count);
    let mut alphas: Vec<u8> = Vec::with_capacity(count);

    for y in 0..h {
        for x in 0..w {
            reds.clear();
            greens.clear();
            blues.clear();
            alphas.clear();
            for_each_neighbor(buf, window, x, y, |word| {
                let (r, g, b, a) = color::extract_rgba(word);
                reds.push(r);
                greens.push(g);
                blues.push(b);
                alphas.push(a);
            });
            reds.sort_unstable();
            greens.sort_unstable();
            blues.sort_unstable();
            alphas.sort_unstable();
            out_mut.set_rgba_unchecked(
                x,
                y,
                reds[select],
                greens[select],
                blues[select],
                alphas[select],
            );
        }
    }

    Ok(out_mut.into())
}

/// Median filter (rank 0.5, upper median for even windows).
pub fn median_filter(buf: &PixelBuffer, window: u32) -> FilterResult<PixelBuffer> {
    rank_filter(buf, window, 0.5)
}

/// Minimum filter (rank 0.0).
pub fn min_filter(buf: &PixelBuffer, window: u32) -> FilterResult<PixelBuffer> {
    rank_filter(buf, window, 0.0)
}

/// Maximum filter (rank 1.0).
pub fn max_filter(buf: &PixelBuffer, window: u32) -> FilterResult<PixelBuffer> {
    rank_filter(buf, window, 1.0)
}

/// Index into the sorted window for a rank, validating both parameters.
fn selection_index(window: u32, rank: f64) -> FilterResult<usize> {
    if window == 0 {
        return Err(FilterError::InvalidParameters(
            "window must be >= 1".into(),
        ));
    }
    if !(0.0..=1.0).contains(&rank) {
        return Err(FilterError::InvalidParameters(
            "rank must be in [0.0, 1.0]".into(),
        ));
    }
    let count = (window as usize) * (window as usize);
    Ok(((rank * count as f64).floor() as usize).min(count - 1))
}

/// Visit the edge-clamped `window x window` neighborhood of (x, y).
#[inline]
fn for_each_neighbor(buf: &PixelBuffer, window: u32, x: u32, y: u32, mut visit: impl FnMut(u32)) {
    let w = buf.width() as i64;
    let h = buf.height() as i64;
    let half = (window / 2) as i64;

    for dy in 0..window as i64 {
        let sy = (y as i64 + dy - half).clamp(0, h - 1) as u32;
        for dx in 0..window as i64 {
            let sx = (x as i64 + dx - half).clamp(0, w - 1) as u32;
            visit(buf.get_pixel_unchecked(sx, sy));
        }
    }
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
