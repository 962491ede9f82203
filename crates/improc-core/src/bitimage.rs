//! BitImage - packed 1-bit-per-pixel raster
//!
//! # Pixel layout
//!
//! - Each row occupies `stride = ceil(width / 8)` bytes
//! - Rows are stored back to back with no extra alignment
//! - Pixels are packed MSB to LSB within each byte: pixel `x` of row `y`
//!   lives at byte `stride * y + x / 8`, bit `7 - x % 8`
//! - Bits beyond `width` in the last byte of a row are padding and are
//!   always zero
//!
//! Packed images are produced from 8-bit dense images by thresholding
//! ([`BitImage::pack`]) and converted back with [`BitImage::unpack`].

use crate::error::{Error, Result, try_alloc};
use crate::image::{Image, ImageData};
use rayon::prelude::*;

/// Minimum width accepted by morphology and labeling
pub const MIN_WIDTH: u32 = 9;
/// Minimum height accepted by morphology and labeling
pub const MIN_HEIGHT: u32 = 3;

/// Packed binary image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitImage {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

/// Bytes needed for one packed row of `width` pixels.
#[inline]
pub fn stride_for(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Mask of the valid (non-padding) bits in the last byte of a row.
#[inline]
fn valid_bits_mask(width: u32) -> u8 {
    match width % 8 {
        0 => 0xff,
        rest => 0xffu8 << (8 - rest),
    }
}

impl BitImage {
    /// Create an all-background image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let stride = stride_for(width);
        Ok(BitImage {
            width,
            height,
            stride,
            data: try_alloc(stride * height as usize)?,
        })
    }

    /// Wrap packed bytes produced elsewhere.
    ///
    /// Padding bits are cleared so the zero-padding invariant holds for
    /// every image in circulation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `bytes.len() != stride * height`.
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let stride = stride_for(width);
        let expected = stride * height as usize;
        if bytes.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let mut img = BitImage {
            width,
            height,
            stride,
            data: bytes,
        };
        img.clear_padding();
        Ok(img)
    }

    /// Allocate an all-background image with the same geometry.
    pub fn similar(&self) -> Result<Self> {
        BitImage::new(self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row length in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the image and return the packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Packed bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    /// Valid bits of the last byte of each row.
    #[inline]
    pub fn last_byte_mask(&self) -> u8 {
        valid_bits_mask(self.width)
    }

    /// Get the pixel at (x, y), or `None` when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get the pixel at (x, y) without bounds checking against width.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> bool {
        let byte = self.data[y as usize * self.stride + (x / 8) as usize];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Set the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        let byte = &mut self.data[y as usize * self.stride + (x / 8) as usize];
        let bit = 0x80u8 >> (x % 8);
        if value {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
        Ok(())
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> u64 {
        self.data
            .par_iter()
            .map(|b| b.count_ones() as u64)
            .sum()
    }

    /// Whether the image has no foreground pixel.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Zero the padding bits at the end of every row.
    pub fn clear_padding(&mut self) {
        let mask = valid_bits_mask(self.width);
        if mask == 0xff {
            return;
        }
        let stride = self.stride;
        for row in self.data.chunks_exact_mut(stride) {
            row[stride - 1] &= mask;
        }
    }

    /// Check the image is large enough for the 3x3 morphology kernel and
    /// the byte-boundary logic built on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooSmall`] if width < [`MIN_WIDTH`] or
    /// height < [`MIN_HEIGHT`].
    pub fn check_processable(&self) -> Result<()> {
        check_min_size(self.width, self.height)
    }

    /// Threshold an 8-bit image into a packed image.
    ///
    /// A pixel becomes foreground when its value is strictly greater than
    /// `threshold`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedType`] if `img` is not 8-bit
    /// - [`Error::InvalidDimension`] if either side is smaller than 2
    pub fn pack(img: &Image, threshold: f64) -> Result<Self> {
        let src = img.require_u8()?;
        let (w, h) = img.dimensions();
        if w < 2 || h < 2 {
            return Err(Error::InvalidDimension {
                width: w,
                height: h,
            });
        }
        let mut out = BitImage::new(w, h)?;
        let stride = out.stride;
        out.data
            .par_chunks_mut(stride)
            .zip(src.par_chunks(w as usize))
            .for_each(|(dst, line)| {
                for (byte, pixels) in dst.iter_mut().zip(line.chunks(8)) {
                    let mut packed = 0u8;
                    for (i, &v) in pixels.iter().enumerate() {
                        if v as f64 > threshold {
                            packed |= 0x80 >> i;
                        }
                    }
                    *byte = packed;
                }
            });
        Ok(out)
    }

    /// Expand into an 8-bit image with 255 for foreground and 0 for
    /// background.
    pub fn unpack(&self) -> Result<Image> {
        let w = self.width as usize;
        let mut buf: Vec<u8> = try_alloc(w * self.height as usize)?;
        buf.par_chunks_mut(w)
            .zip(self.data.par_chunks(self.stride))
            .for_each(|(line, packed)| {
                for (x, px) in line.iter_mut().enumerate() {
                    *px = if packed[x / 8] & (0x80 >> (x % 8)) != 0 {
                        255
                    } else {
                        0
                    };
                }
            });
        Image::from_data(self.width, self.height, ImageData::U8(buf))
    }

    /// Expand into one `usize` per pixel: 1 for foreground, 0 for
    /// background. This is the starting buffer of component labeling.
    pub fn to_label_buffer(&self) -> Result<Vec<usize>> {
        let w = self.width as usize;
        let mut buf: Vec<usize> = try_alloc(w * self.height as usize)?;
        buf.par_chunks_mut(w)
            .zip(self.data.par_chunks(self.stride))
            .for_each(|(line, packed)| {
                for (x, px) in line.iter_mut().enumerate() {
                    *px = ((packed[x / 8] >> (7 - x % 8)) & 1) as usize;
                }
            });
        Ok(buf)
    }
}

/// Reject sizes below [`MIN_WIDTH`] x [`MIN_HEIGHT`].
pub fn check_min_size(width: u32, height: u32) -> Result<()> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        log::debug!("rejecting {width}x{height} image: below {MIN_WIDTH}x{MIN_HEIGHT}");
        return Err(Error::TooSmall {
            width,
            height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }
    Ok(())
}
