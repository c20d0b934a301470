//! RGBA8 bitmap with validated dimensions.

use crate::error::ProcessError;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A row-major RGBA8 image.
///
/// The buffer length is always `width * height * 4` and both dimensions are
/// positive; constructors reject anything else, so downstream stages index
/// without re-checking.
///
/// # Example
///
/// ```
/// use poster_pipeline::Bitmap;
///
/// let bitmap = Bitmap::filled(3, 2, [10, 20, 30, 255]).unwrap();
/// assert_eq!(bitmap.pixel(2, 1), [10, 20, 30, 255]);
/// assert_eq!(bitmap.as_bytes().len(), 3 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap an RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// [`ProcessError::InvalidDimensions`] if either dimension is zero or
    /// `data.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ProcessError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS));
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(ProcessError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A bitmap with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, ProcessError> {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(width, height, data)
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 4],
    ) -> Result<Self, ProcessError> {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// RGBA of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Iterate over pixels as `[R, G, B, A]` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    pub(crate) fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        self.data.chunks_exact_mut(CHANNELS)
    }
}
