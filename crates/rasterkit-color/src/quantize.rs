//! Quantization and ordered dithering
//!
//! Two ways to collapse a channel to a small number of levels: straight
//! uniform quantization, and ordered dithering driven by a Bayer-style
//! threshold map so that intermediate tones come out as a spatial pattern
//! of the neighboring levels instead of banding.
//!
//! # Threshold-map convention
//!
//! Maps hold ordinal ranks `1..=n*n`; the decision threshold for a cell is
//! `rank / (n*n + 1)`. Thresholds therefore sit strictly inside (0, 1): a
//! channel exactly on a level never rounds up, a channel one step below
//! the next level always does somewhere in the tile. The 2x2 and 3x3 maps
//! are fixed tables; every even size is built recursively from its half
//! size by quadrant expansion.

use crate::{ColorError, ColorResult};
use rasterkit_core::{PixelBuffer, PixelFormat, color};

/// A square dither threshold matrix of ordinal ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdMap {
    size: u32,
    /// Ranks `1..=size*size`, row-major.
    ranks: Vec<u32>,
}

impl ThresholdMap {
    /// Generate the threshold map for `size`.
    ///
    /// Sizes 2 and 3 are fixed base tables. An even size `2k` is built
    /// from the map for `k` by quadrant expansion: a cell of rank `v`
    /// becomes
    ///
    /// ```text
    /// 4(v-1)+1  4(v-1)+3
    /// 4(v-1)+4  4(v-1)+2
    /// ```
    ///
    /// with the four cells placed at (y, x), (y, x+k), (y+k, x),
    /// (y+k, x+k).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::UnsupportedMapSize`] for any size that is not
    /// 2, 3, or an even size whose repeated halving reaches 2 or 3.
    pub fn generate(size: u32) -> ColorResult<Self> {
        match size {
            2 => {
                #[rustfmt::skip]
                let ranks = vec![
                    1, 3,
                    4, 2,
                ];
                Ok(ThresholdMap { size: 2, ranks })
            }
            3 => {
                #[rustfmt::skip]
                let ranks = vec![
                    3, 7, 4,
                    6, 1, 9,
                    2, 8, 5,
                ];
                Ok(ThresholdMap { size: 3, ranks })
            }
            n if n >= 4 && n % 2 == 0 => {
                let half = Self::generate(n / 2)
                    .map_err(|_| ColorError::UnsupportedMapSize(size))?;
                Ok(half.expand())
            }
            other => Err(ColorError::UnsupportedMapSize(other)),
        }
    }

    /// Quadrant expansion to the doubled size.
    fn expand(&self) -> Self {
        let s = self.size;
        let doubled = 2 * s;
        let mut ranks = vec![0u32; (doubled * doubled) as usize];
        let idx = |y: u32, x: u32| (y * doubled + x) as usize;

        for y in 0..s {
            for x in 0..s {
                let v = self.ranks[(y * s + x) as usize];
                let base = 4 * (v - 1);
                ranks[idx(y, x)] = base + 1;
                ranks[idx(y, x + s)] = base + 3;
                ranks[idx(y + s, x)] = base + 4;
                ranks[idx(y + s, x + s)] = base + 2;
            }
        }

        ThresholdMap {
            size: doubled,
            ranks,
        }
    }

    /// Map side length.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Ordinal rank for image coordinates (tiled: indexed
    /// `(y % size, x % size)`).
    #[inline]
    pub fn rank(&self, x: u32, y: u32) -> u32 {
        let mx = x % self.size;
        let my = y % self.size;
        self.ranks[(my * self.size + mx) as usize]
    }

    /// Dither decision threshold in (0, 1) for image coordinates.
    #[inline]
    pub fn threshold(&self, x: u32, y: u32) -> f64 {
        let cells = self.size as u64 * self.size as u64;
        self.rank(x, y) as f64 / (cells + 1) as f64
    }
}

/// Quantize one channel value to `levels` uniform steps.
///
/// `levels <= 1` collapses the channel to 0.
#[inline]
fn quantize_channel(value: u8, levels: u32) -> u8 {
    if levels <= 1 {
        return 0;
    }
    let steps = (levels - 1) as u64;
    let level = value as u64 * steps / 255;
    (level * 255 / steps) as u8
}

/// Dither one channel value against a positional threshold.
#[inline]
fn dither_channel(value: u8, levels: u32, threshold: f64) -> u8 {
    let scaled = value as f64 / 255.0 * (levels - 1) as f64;
    let base = scaled.floor();
    let residual = scaled - base;
    let quantized = if residual >= threshold { base + 1.0 } else { base };
    let quantized = quantized.clamp(0.0, (levels - 1) as f64);
    (quantized * 255.0 / (levels - 1) as f64).round() as u8
}

/// Collapse each channel to evenly spaced output values.
///
/// Per channel: `level = value * (levels-1) / 255` (integer floor), output
/// `level * 255 / (levels-1)`; `levels = 256` is the identity and
/// `levels <= 1` collapses the channel to 0. Gray buffers use `levels_r`
/// for their single channel; alpha is untouched.
pub fn uniform_quantize(
    buf: &PixelBuffer,
    levels_r: u32,
    levels_g: u32,
    levels_b: u32,
) -> PixelBuffer {
    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    match buf.format() {
        PixelFormat::Gray8 => {
            for y in 0..h {
                for x in 0..w {
                    let v = (buf.get_pixel_unchecked(x, y) & 0xff) as u8;
                    out_mut.set_gray_unchecked(x, y, quantize_channel(v, levels_r));
                }
            }
        }
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
            for y in 0..h {
                for x in 0..w {
                    let (r, g, b, a) = color::extract_rgba(buf.get_pixel_unchecked(x, y));
                    out_mut.set_rgba_unchecked(
                        x,
                        y,
                        quantize_channel(r, levels_r),
                        quantize_channel(g, levels_g),
                        quantize_channel(b, levels_b),
                        a,
                    );
                }
            }
        }
    }

    out_mut.into()
}

/// Ordered dithering against the threshold map for `map_size`.
///
/// Per channel: scale into level space, split into base level and
/// residual, promote to the next level where the residual reaches the
/// positional threshold, and reconstruct to the byte range. The same
/// quantization levels apply to every color channel; alpha is untouched.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedMapSize`] for an unsupported map size
/// and [`ColorError::InvalidParameters`] for `levels < 2`.
pub fn ordered_dither(buf: &PixelBuffer, map_size: u32, levels: u32) -> ColorResult<PixelBuffer> {
    if levels < 2 {
        return Err(ColorError::InvalidParameters(format!(
            "dithering needs at least 2 levels, got {levels}"
        )));
    }
    let map = ThresholdMap::generate(map_size)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    match buf.format() {
        PixelFormat::Gray8 => {
            for y in 0..h {
                for x in 0..w {
                    let t = map.threshold(x, y);
                    let v = (buf.get_pixel_unchecked(x, y) & 0xff) as u8;
                    out_mut.set_gray_unchecked(x, y, dither_channel(v, levels, t));
                }
            }
        }
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
            for y in 0..h {
                for x in 0..w {
                    let t = map.threshold(x, y);
                    let (r, g, b, a) = color::extract_rgba(buf.get_pixel_unchecked(x, y));
                    out_mut.set_rgba_unchecked(
                        x,
                        y,
                        dither_channel(r, levels, t),
                        dither_channel(g, levels, t),
                        dither_channel(b, levels, t),
                        a,
                    );
                }
            }
        }
    }

    Ok(out_mut.into())
}
