//! PixelBuffer - the raster container
//!
//! `PixelBuffer` is the image type every filter in rasterkit consumes and
//! produces. It stores one packed 32-bit word per pixel, row-major:
//! `0xRRGGBBAA` for color formats, the raw sample value in the low byte for
//! grayscale.
//!
//! # Ownership model
//!
//! `PixelBuffer` is cheap to clone (`Arc`-shared) and immutable. To write
//! pixels, take exclusive ownership with [`PixelBuffer::try_into_mut`],
//! mutate through [`PixelBufferMut`], and convert back with
//! `Into<PixelBuffer>`. Filters follow a strict discipline: read only the
//! source buffer, write only a freshly allocated output (usually from
//! [`PixelBuffer::create_template`]), so a buffer handed to a filter is
//! never observed mid-mutation and kernels/maps can be shared across
//! concurrent invocations.

use crate::color;
use crate::error::{CoreError, CoreResult};
use std::sync::Arc;

/// Sample layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit channel.
    Gray8,
    /// Three 8-bit channels; the packed alpha byte is fixed at 255.
    Rgb8,
    /// Four 8-bit channels.
    Rgba8,
}

impl PixelFormat {
    /// Number of meaningful channels per pixel.
    pub fn channels(self) -> u32 {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Whether this format carries color channels.
    pub fn is_color(self) -> bool {
        !matches!(self, PixelFormat::Gray8)
    }

    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Gray8 => "gray8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba8 => "rgba8",
        }
    }

    /// Word value a zero-initialized pixel takes in this format.
    ///
    /// `Rgb8` pixels always carry alpha 255 in the packed word, including
    /// right after allocation.
    fn fill_word(self) -> u32 {
        match self {
            PixelFormat::Gray8 => 0,
            PixelFormat::Rgb8 => color::compose_rgb(0, 0, 0),
            PixelFormat::Rgba8 => color::compose_rgba(0, 0, 0, 0),
        }
    }
}

#[derive(Debug)]
struct BufferData {
    width: u32,
    height: u32,
    format: PixelFormat,
    /// One word per pixel, row-major.
    data: Vec<u32>,
}

/// Immutable, shareable raster image.
///
/// # Examples
///
/// ```
/// use rasterkit_core::{PixelBuffer, PixelFormat};
///
/// let buf = PixelBuffer::new(640, 480, PixelFormat::Rgb8).unwrap();
/// assert_eq!(buf.width(), 640);
/// assert_eq!(buf.height(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    inner: Arc<BufferData>,
}

impl PixelBuffer {
    /// Create a black buffer of the given size and format.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimension`] if either dimension is 0.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimension { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(CoreError::InvalidDimension { width, height })?;
        let data = vec![format.fill_word(); len];
        Ok(PixelBuffer {
            inner: Arc::new(BufferData {
                width,
                height,
                format,
                data,
            }),
        })
    }

    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Sample layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.inner.format
    }

    /// Raw packed pixel words, row-major.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Number of strong references to this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Get the packed word at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.inner.width || y >= self.inner.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get the packed word at (x, y) without a bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.inner.width && y < self.inner.height);
        self.inner.data[(y as usize) * (self.inner.width as usize) + x as usize]
    }

    /// Get RGBA channel values at (x, y).
    ///
    /// For `Gray8` buffers the gray value is replicated into R, G and B
    /// with alpha 255.
    #[inline]
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<(u8, u8, u8, u8)> {
        let word = self.get_pixel(x, y)?;
        Some(match self.inner.format {
            PixelFormat::Gray8 => {
                let v = (word & 0xff) as u8;
                (v, v, v, 255)
            }
            _ => color::extract_rgba(word),
        })
    }

    /// New zeroed buffer with the same dimensions and format.
    pub fn create_template(&self) -> Self {
        let len = self.inner.data.len();
        PixelBuffer {
            inner: Arc::new(BufferData {
                width: self.inner.width,
                height: self.inner.height,
                format: self.inner.format,
                data: vec![self.inner.format.fill_word(); len],
            }),
        }
    }

    /// Independent copy of this buffer's pixels.
    pub fn deep_clone(&self) -> Self {
        PixelBuffer {
            inner: Arc::new(BufferData {
                width: self.inner.width,
                height: self.inner.height,
                format: self.inner.format,
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Take exclusive write access.
    ///
    /// Succeeds only when this handle is the sole owner; the shared case
    /// returns the handle back so the caller can [`Self::deep_clone`]
    /// instead. Output buffers from [`Self::create_template`] are always
    /// sole-owned, so filters unwrap this directly.
    pub fn try_into_mut(self) -> Result<PixelBufferMut, PixelBuffer> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixelBufferMut { data }),
            Err(inner) => Err(PixelBuffer { inner }),
        }
    }

    /// Exclusive write access, copying the pixels when shared.
    pub fn to_mut(&self) -> PixelBufferMut {
        match self.deep_clone().try_into_mut() {
            Ok(m) => m,
            // deep_clone always produces a sole owner
            Err(_) => unreachable!(),
        }
    }
}

/// Exclusively owned, writable raster image.
///
/// Obtained from [`PixelBuffer::try_into_mut`] / [`PixelBuffer::to_mut`];
/// convert back with `Into<PixelBuffer>` when done writing.
#[derive(Debug)]
pub struct PixelBufferMut {
    data: BufferData,
}

impl PixelBufferMut {
    /// Buffer width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.data.width
    }

    /// Buffer height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.data.height
    }

    /// Sample layout.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.data.format
    }

    /// Get the packed word at (x, y), or `None` when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.data.width || y >= self.data.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get the packed word at (x, y) without a bounds check.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.data.width && y < self.data.height);
        self.data.data[(y as usize) * (self.data.width as usize) + x as usize]
    }

    /// Set the packed word at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfBounds`] when the coordinates fall outside
    /// the buffer.
    pub fn set_pixel(&mut self, x: u32, y: u32, word: u32) -> CoreResult<()> {
        if x >= self.data.width || y >= self.data.height {
            return Err(CoreError::OutOfBounds {
                x,
                y,
                width: self.data.width,
                height: self.data.height,
            });
        }
        self.set_pixel_unchecked(x, y, word);
        Ok(())
    }

    /// Set the packed word at (x, y) without a bounds check.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, word: u32) {
        debug_assert!(x < self.data.width && y < self.data.height);
        self.data.data[(y as usize) * (self.data.width as usize) + x as usize] = word;
    }

    /// Set a gray sample at (x, y).
    ///
    /// Only meaningful for `Gray8` buffers.
    #[inline]
    pub fn set_gray_unchecked(&mut self, x: u32, y: u32, value: u8) {
        self.set_pixel_unchecked(x, y, value as u32);
    }

    /// Set an RGB pixel at (x, y), alpha 255.
    #[inline]
    pub fn set_rgb_unchecked(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        self.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
    }

    /// Set an RGBA pixel at (x, y).
    #[inline]
    pub fn set_rgba_unchecked(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        self.set_pixel_unchecked(x, y, color::compose_rgba(r, g, b, a));
    }
}

impl From<PixelBufferMut> for PixelBuffer {
    fn from(m: PixelBufferMut) -> Self {
        PixelBuffer {
            inner: Arc::new(m.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(PixelBuffer::new(0, 10, PixelFormat::Gray8).is_err());
        assert!(PixelBuffer::new(10, 0, PixelFormat::Rgb8).is_err());
        assert!(PixelBuffer::new(1, 1, PixelFormat::Rgba8).is_ok());
    }

    #[test]
    fn test_rgb8_fill_has_opaque_alpha() {
        let buf = PixelBuffer::new(2, 2, PixelFormat::Rgb8).unwrap();
        let (_, _, _, a) = buf.get_rgba(0, 0).unwrap();
        assert_eq!(a, 255);
    }

    #[test]
    fn test_get_pixel_bounds() {
        let buf = PixelBuffer::new(3, 2, PixelFormat::Gray8).unwrap();
        assert!(buf.get_pixel(2, 1).is_some());
        assert!(buf.get_pixel(3, 0).is_none());
        assert!(buf.get_pixel(0, 2).is_none());
    }

    #[test]
    fn test_mutation_round_trip() {
        let buf = PixelBuffer::new(4, 4, PixelFormat::Gray8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        m.set_gray_unchecked(1, 2, 200);
        let buf: PixelBuffer = m.into();
        assert_eq!(buf.get_pixel_unchecked(1, 2), 200);
        assert_eq!(buf.get_pixel_unchecked(0, 0), 0);
    }

    #[test]
    fn test_try_into_mut_fails_when_shared() {
        let buf = PixelBuffer::new(2, 2, PixelFormat::Gray8).unwrap();
        let other = buf.clone();
        assert!(buf.try_into_mut().is_err());
        drop(other);
    }

    #[test]
    fn test_create_template_is_zeroed() {
        let buf = PixelBuffer::new(2, 2, PixelFormat::Rgb8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        m.set_rgb_unchecked(0, 0, 9, 9, 9);
        let buf: PixelBuffer = m.into();
        let t = buf.create_template();
        assert_eq!(t.format(), PixelFormat::Rgb8);
        assert_eq!(t.get_rgba(0, 0).unwrap(), (0, 0, 0, 255));
    }

    #[test]
    fn test_gray_get_rgba_replicates() {
        let buf = PixelBuffer::new(1, 1, PixelFormat::Gray8).unwrap();
        let mut m = buf.try_into_mut().unwrap();
        m.set_gray_unchecked(0, 0, 77);
        let buf: PixelBuffer = m.into();
        assert_eq!(buf.get_rgba(0, 0).unwrap(), (77, 77, 77, 255));
    }
}
