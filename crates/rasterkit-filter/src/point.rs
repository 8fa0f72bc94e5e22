//! Point operations
//!
//! Per-pixel, neighborhood-free transforms: invert, brightness, contrast,
//! and gamma correction. Each operation is split into a lookup-table
//! builder (a 256-entry map, cheap to precompute and compose) and a single
//! applier that maps every channel of a buffer through the table. Since a
//! point operation depends only on the channel value, the LUT reproduces
//! the per-pixel formula exactly.

use crate::{FilterError, FilterResult};
use rasterkit_core::{PixelBuffer, PixelFormat, color};

/// Default brightness delta used by UIs that expose a one-click filter.
pub const DEFAULT_BRIGHTNESS_DELTA: i32 = 10;
/// Default contrast adjustment.
pub const DEFAULT_CONTRAST: f64 = 20.0;
/// Default gamma.
pub const DEFAULT_GAMMA: f64 = 1.5;

/// A 256-entry channel lookup table.
pub type PointLut = [u8; 256];

/// The identity mapping.
pub fn identity_lut() -> PointLut {
    std::array::from_fn(|i| i as u8)
}

/// `c' = 255 - c`.
pub fn invert_lut() -> PointLut {
    std::array::from_fn(|i| 255 - i as u8)
}

/// `c' = clamp(c + delta, 0, 255)`.
pub fn brightness_lut(delta: i32) -> PointLut {
    std::array::from_fn(|i| (i as i32 + delta).clamp(0, 255) as u8)
}

/// Contrast adjustment.
///
/// `factor = 259(contrast + 255) / (255(259 - contrast))`, then
/// `c' = clamp(round(factor * (c - 128) + 128), 0, 255)`. `contrast = 0`
/// is the identity; positive values push channels away from mid-gray.
///
/// # Errors
///
/// Returns [`FilterError::Domain`] for `contrast == 259` (the factor's
/// denominator vanishes) and for non-finite inputs.
pub fn contrast_lut(contrast: f64) -> FilterResult<PointLut> {
    if !contrast.is_finite() || contrast == 259.0 {
        return Err(FilterError::Domain(format!(
            "contrast {contrast} has no defined factor"
        )));
    }
    let factor = (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast));
    Ok(std::array::from_fn(|i| {
        let mapped = (factor * (i as f64 - 128.0) + 128.0).round();
        mapped.clamp(0.0, 255.0) as u8
    }))
}

/// Gamma correction: `c' = clamp(round(255 * (c/255)^gamma), 0, 255)`.
///
/// `gamma = 1` is the identity; values above 1 darken, below 1 lighten.
///
/// # Errors
///
/// Returns [`FilterError::Domain`] for `gamma <= 0` or non-finite gamma.
pub fn gamma_lut(gamma: f64) -> FilterResult<PointLut> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(FilterError::Domain(format!("gamma must be > 0, got {gamma}")));
    }
    Ok(std::array::from_fn(|i| {
        let mapped = (255.0 * (i as f64 / 255.0).powf(gamma)).round();
        mapped.clamp(0.0, 255.0) as u8
    }))
}

/// Map every channel of a buffer through a lookup table.
///
/// Gray buffers map their single channel; color buffers map R, G and B
/// and pass alpha through unchanged.
pub fn map_channels(buf: &PixelBuffer, lut: &PointLut) -> PixelBuffer {
    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    match buf.format() {
        PixelFormat::Gray8 => {
            for y in 0..h {
                for x in 0..w {
                    let v = (buf.get_pixel_unchecked(x, y) & 0xff) as usize;
                    out_mut.set_gray_unchecked(x, y, lut[v]);
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
                        lut[r as usize],
                        lut[g as usize],
                        lut[b as usize],
                        a,
                    );
                }
            }
        }
    }

    out_mut.into()
}

/// Invert every channel.
pub fn invert(buf: &PixelBuffer) -> PixelBuffer {
    map_channels(buf, &invert_lut())
}

/// Add `delta` to every channel, clamped.
pub fn adjust_brightness(buf: &PixelBuffer, delta: i32) -> PixelBuffer {
    map_channels(buf, &brightness_lut(delta))
}

/// Apply the contrast curve.
///
/// # Errors
///
/// See [`contrast_lut`].
pub fn adjust_contrast(buf: &PixelBuffer, contrast: f64) -> FilterResult<PixelBuffer> {
    Ok(map_channels(buf, &contrast_lut(contrast)?))
}

/// Apply gamma correction.
///
/// # Errors
///
/// See [`gamma_lut`].
pub fn gamma_correct(buf: &PixelBuffer, gamma: f64) -> FilterResult<PixelBuffer> {
    Ok(map_channels(buf, &gamma_lut(gamma)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_rgb(w: u32, h: u32) -> PixelBuffer {
        let buf = PixelBuffer::new(w, h, PixelFormat::Rgb8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        for y in 0..h {
            for x in 0..w {
                let v = ((x + y * w) * 7 % 256) as u8;
                m.set_rgb_unchecked(x, y, v, v.wrapping_add(40), v.wrapping_add(90));
            }
        }
        m.into()
    }

    #[test]
    fn test_invert_is_involution() {
        let buf = gradient_rgb(6, 4);
        let twice = invert(&invert(&buf));
        assert_eq!(twice.data(), buf.data());
    }

    #[test]
    fn test_identity_parameters_are_noops() {
        let buf = gradient_rgb(5, 5);
        assert_eq!(adjust_brightness(&buf, 0).data(), buf.data());
        assert_eq!(adjust_contrast(&buf, 0.0).unwrap().data(), buf.data());
        assert_eq!(gamma_correct(&buf, 1.0).unwrap().data(), buf.data());
        assert_eq!(map_channels(&buf, &identity_lut()).data(), buf.data());
    }

    #[test]
    fn test_brightness_clamps() {
        let lut = brightness_lut(100);
        assert_eq!(lut[200], 255);
        assert_eq!(lut[0], 100);
        let lut = brightness_lut(-100);
        assert_eq!(lut[50], 0);
        assert_eq!(lut[200], 100);
    }

    #[test]
    fn test_contrast_pivots_at_mid_gray() {
        let lut = contrast_lut(64.0).unwrap();
        // 128 is the fixed point of the curve
        assert_eq!(lut[128], 128);
        // Values spread away from the pivot
        assert!(lut[200] > 200);
        assert!(lut[50] < 50);
    }

    #[test]
    fn test_contrast_259_rejected() {
        assert!(matches!(
            contrast_lut(259.0),
            Err(FilterError::Domain(_))
        ));
    }

    #[test]
    fn test_gamma_endpoints_fixed() {
        let lut = gamma_lut(DEFAULT_GAMMA).unwrap();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        // gamma > 1 darkens midtones
        assert!(lut[128] < 128);
    }

    #[test]
    fn test_gamma_known_value() {
        // 255 * (128/255)^1.5 = 90.63 -> 91
        let lut = gamma_lut(1.5).unwrap();
        assert_eq!(lut[128], 91);
    }

    #[test]
    fn test_gamma_rejects_non_positive() {
        assert!(gamma_lut(0.0).is_err());
        assert!(gamma_lut(-1.0).is_err());
    }

    #[test]
    fn test_alpha_passes_through() {
        let buf = PixelBuffer::new(1, 1, PixelFormat::Rgba8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        m.set_rgba_unchecked(0, 0, 10, 20, 30, 77);
        let buf: PixelBuffer = m.into();
        let out = invert(&buf);
        assert_eq!(out.get_rgba(0, 0).unwrap(), (245, 235, 225, 77));
    }

    #[test]
    fn test_gray_buffer_mapped() {
        let buf = PixelBuffer::new(2, 1, PixelFormat::Gray8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        m.set_gray_unchecked(0, 0, 0);
        m.set_gray_unchecked(1, 0, 200);
        let buf: PixelBuffer = m.into();
        let out = adjust_brightness(&buf, 60);
        assert_eq!(out.get_pixel_unchecked(0, 0), 60);
        assert_eq!(out.get_pixel_unchecked(1, 0), 255);
    }
}
