//! RGB / HSV conversion and channel extraction
//!
//! Hue, saturation and value are packed into bytes: H as
//! `round(H_degrees / 360 * 255)`, S and V as `round(x * 255)`. An HSV
//! buffer reuses the color pixel layout with H, S, V in the R, G, B slots,
//! so the extraction and recombination functions can treat it like any
//! other buffer.
//!
//! Byte-packed hue has a step of ~1.41 degrees, so a full conversion
//! round-trip reproduces primaries exactly and most colors within ±2 per
//! channel; fully saturated colors sitting on a sector boundary (yellow,
//! cyan, magenta) can land up to 4 counts off.

use crate::{ColorError, ColorResult};
use rasterkit_core::{PixelBuffer, PixelFormat, color};

/// Byte-packed HSV color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    /// Hue: 0..=255 maps onto 0..360 degrees.
    pub h: u8,
    /// Saturation: 0..=255 maps onto 0.0..1.0.
    pub s: u8,
    /// Value: 0..=255 maps onto 0.0..1.0.
    pub v: u8,
}

impl Hsv8 {
    /// Create a byte-packed HSV color.
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Channel selector for [`extract_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsvChannel {
    Hue,
    Saturation,
    Value,
}

/// Convert RGB channel values to byte-packed HSV.
///
/// Standard max/min/delta derivation. Achromatic input (delta 0) yields
/// hue 0 and saturation 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv8 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f64;
    let v = max;

    if delta == 0.0 {
        return Hsv8 { h: 0, s: 0, v };
    }

    let s = (255.0 * delta / max as f64).round() as u8;

    let (ri, gi, bi) = (r as f64, g as f64, b as f64);
    let mut h_deg = if r == max {
        60.0 * (gi - bi) / delta
    } else if g == max {
        60.0 * (2.0 + (bi - ri) / delta)
    } else {
        60.0 * (4.0 + (ri - gi) / delta)
    };
    if h_deg < 0.0 {
        h_deg += 360.0;
    }
    if h_deg >= 360.0 {
        h_deg -= 360.0;
    }

    let h = (h_deg / 360.0 * 255.0).round() as u8;
    Hsv8 { h, s, v }
}

/// Convert byte-packed HSV back to RGB channel values.
///
/// Sector reconstruction: `i = floor(H' / 60) mod 6` with fractional part
/// `f`, then the sector-specific combination of v, p, q, t.
pub fn hsv_to_rgb(hsv: Hsv8) -> (u8, u8, u8) {
    if hsv.s == 0 {
        return (hsv.v, hsv.v, hsv.v);
    }

    let h_deg = hsv.h as f64 / 255.0 * 360.0;
    let s = hsv.s as f64 / 255.0;
    let v = hsv.v as f64 / 255.0;

    let sector = h_deg / 60.0;
    let i = (sector.floor() as i64).rem_euclid(6);
    let f = sector - sector.floor();

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

/// Convert an RGB(A) buffer to HSV, packed into the R/G/B channel slots.
///
/// Alpha passes through unchanged.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] for grayscale input.
pub fn rgb_buffer_to_hsv(buf: &PixelBuffer) -> ColorResult<PixelBuffer> {
    check_color(buf)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let (r, g, b, a) = color::extract_rgba(buf.get_pixel_unchecked(x, y));
            let hsv = rgb_to_hsv(r, g, b);
            out_mut.set_rgba_unchecked(x, y, hsv.h, hsv.s, hsv.v, a);
        }
    }

    Ok(out_mut.into())
}

/// Convert an HSV buffer (H/S/V in the R/G/B slots) back to RGB.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] for grayscale input.
pub fn hsv_buffer_to_rgb(buf: &PixelBuffer) -> ColorResult<PixelBuffer> {
    check_color(buf)?;

    let w = buf.width();
    let h = buf.height();
    let out = buf.create_template();
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let (hh, ss, vv, a) = color::extract_rgba(buf.get_pixel_unchecked(x, y));
            let (r, g, b) = hsv_to_rgb(Hsv8::new(hh, ss, vv));
            out_mut.set_rgba_unchecked(x, y, r, g, b, a);
        }
    }

    Ok(out_mut.into())
}

/// Extract one HSV channel as a grayscale buffer.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] for grayscale input.
pub fn extract_channel(hsv_buf: &PixelBuffer, channel: HsvChannel) -> ColorResult<PixelBuffer> {
    check_color(hsv_buf)?;

    let w = hsv_buf.width();
    let h = hsv_buf.height();
    let out = PixelBuffer::new(w, h, PixelFormat::Gray8)?;
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let word = hsv_buf.get_pixel_unchecked(x, y);
            let value = match channel {
                HsvChannel::Hue => color::red(word),
                HsvChannel::Saturation => color::green(word),
                HsvChannel::Value => color::blue(word),
            };
            out_mut.set_gray_unchecked(x, y, value);
        }
    }

    Ok(out_mut.into())
}

/// Rebuild an RGB buffer from three grayscale H, S, V planes.
///
/// The planes need not come from the same source image, which allows a
/// caller to edit one channel (e.g. flatten saturation) before
/// recombination.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedFormat`] unless all three planes are
/// grayscale, and [`ColorError::Core`] (dimension mismatch) when their
/// sizes differ.
pub fn hsv_planes_to_rgb(
    h_plane: &PixelBuffer,
    s_plane: &PixelBuffer,
    v_plane: &PixelBuffer,
) -> ColorResult<PixelBuffer> {
    for plane in [h_plane, s_plane, v_plane] {
        if plane.format() != PixelFormat::Gray8 {
            return Err(ColorError::UnsupportedFormat {
                expected: "gray8",
                actual: plane.format().name(),
            });
        }
    }
    let dims = (h_plane.width(), h_plane.height());
    for plane in [s_plane, v_plane] {
        if (plane.width(), plane.height()) != dims {
            return Err(ColorError::Core(rasterkit_core::CoreError::DimensionMismatch {
                expected: dims,
                actual: (plane.width(), plane.height()),
            }));
        }
    }

    let (w, h) = dims;
    let out = PixelBuffer::new(w, h, PixelFormat::Rgb8)?;
    let mut out_mut = out.try_into_mut().unwrap();

    for y in 0..h {
        for x in 0..w {
            let hsv = Hsv8::new(
                (h_plane.get_pixel_unchecked(x, y) & 0xff) as u8,
                (s_plane.get_pixel_unchecked(x, y) & 0xff) as u8,
                (v_plane.get_pixel_unchecked(x, y) & 0xff) as u8,
            );
            let (r, g, b) = hsv_to_rgb(hsv);
            out_mut.set_rgb_unchecked(x, y, r, g, b);
        }
    }

    Ok(out_mut.into())
}

fn check_color(buf: &PixelBuffer) -> ColorResult<()> {
    if !buf.format().is_color() {
        return Err(ColorError::UnsupportedFormat {
            expected: "rgb8 or rgba8",
            actual: buf.format().name(),
        });
    }
    Ok(())
}
