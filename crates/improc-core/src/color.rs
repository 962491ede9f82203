//! ColorImage - 3-channel byte raster for colour rendering
//!
//! Pixels are stored as consecutive `[r, g, b]` triples in row-major
//! order, `3 * width` bytes per row.

use crate::error::{Error, Result, try_alloc};
use crate::image::Image;
use rayon::prelude::*;

/// RGB triple
pub type Rgb = [u8; 3];

pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

/// 3-channel 8-bit image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ColorImage {
    /// Create an all-black image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(ColorImage {
            width,
            height,
            data: try_alloc(3 * width as usize * height as usize)?,
        })
    }

    /// Replicate an 8-bit gray image into all three channels.
    pub fn from_gray(img: &Image) -> Result<Self> {
        let src = img.require_u8()?;
        let mut out = ColorImage::new(img.width(), img.height())?;
        out.data
            .par_chunks_mut(3)
            .zip(src.par_iter())
            .for_each(|(px, &v)| px.fill(v));
        Ok(out)
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
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        3 * (y as usize * self.width as usize + x as usize)
    }

    /// Colour at (x, y), or `None` when out of bounds.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Set the colour at (x, y).
    pub fn set_rgb(&mut self, x: u32, y: u32, color: Rgb) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: self.offset(x, y) / 3,
                len: self.width as usize * self.height as usize,
            });
        }
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&color);
        Ok(())
    }

    /// Copy the rectangle with inclusive corners (x0, y0) and (x1, y1).
    ///
    /// Corners may be given in any order and are clamped to the image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the rectangle lies entirely
    /// outside the image.
    pub fn subimage(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<ColorImage> {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let wmax = self.width as i32 - 1;
        let hmax = self.height as i32 - 1;
        if x1 < 0 || y1 < 0 || x0 > wmax || y0 > hmax {
            return Err(Error::InvalidParameter(format!(
                "subimage ({x0},{y0})-({x1},{y1}) outside {}x{} image",
                self.width, self.height
            )));
        }
        let (x0, x1) = (x0.max(0) as u32, x1.min(wmax) as u32);
        let (y0, y1) = (y0.max(0) as u32, y1.min(hmax) as u32);
        let mut out = ColorImage::new(x1 - x0 + 1, y1 - y0 + 1)?;
        let row_bytes = 3 * out.width as usize;
        for (dy, dst) in out.data.chunks_exact_mut(row_bytes).enumerate() {
            let start = self.offset(x0, y0 + dy as u32);
            dst.copy_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(out)
    }
}
