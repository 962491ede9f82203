//! Image - dense typed pixel buffer
//!
//! `Image` stores one element per pixel in row-major order with no
//! padding. The element type is chosen at construction time from
//! [`ImageType`]; the pixel data lives in the matching [`ImageData`]
//! variant, so operations dispatch on the variant once and then run a
//! single generic body.
//!
//! # Examples
//!
//! ```
//! use improc_core::{Image, ImageType};
//!
//! let img = Image::new(64, 48, ImageType::U16).unwrap();
//! assert_eq!(img.pixel_bytes(), 2);
//! assert_eq!(img.min_max(), (0.0, 0.0));
//! ```

use crate::error::{Error, Result, try_alloc};
use rayon::prelude::*;

/// Element type of a dense image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Unsigned 8-bit
    U8,
    /// Unsigned 16-bit
    U16,
    /// Unsigned 32-bit
    U32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl ImageType {
    /// Size of one pixel in bytes.
    pub fn pixel_bytes(self) -> usize {
        match self {
            ImageType::U8 => 1,
            ImageType::U16 => 2,
            ImageType::U32 | ImageType::F32 => 4,
            ImageType::F64 => 8,
        }
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ImageType::U8 => "u8",
            ImageType::U16 => "u16",
            ImageType::U32 => "u32",
            ImageType::F32 => "f32",
            ImageType::F64 => "f64",
        }
    }
}

/// Pixel storage, one variant per element type
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ImageData {
    fn zeroed(ty: ImageType, len: usize) -> Result<Self> {
        Ok(match ty {
            ImageType::U8 => ImageData::U8(try_alloc(len)?),
            ImageType::U16 => ImageData::U16(try_alloc(len)?),
            ImageType::U32 => ImageData::U32(try_alloc(len)?),
            ImageType::F32 => ImageData::F32(try_alloc(len)?),
            ImageType::F64 => ImageData::F64(try_alloc(len)?),
        })
    }

    /// Element type of this buffer.
    pub fn image_type(&self) -> ImageType {
        match self {
            ImageData::U8(_) => ImageType::U8,
            ImageData::U16(_) => ImageType::U16,
            ImageData::U32(_) => ImageType::U32,
            ImageData::F32(_) => ImageType::F32,
            ImageData::F64(_) => ImageType::F64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ImageData::U8(v) => v.len(),
            ImageData::U16(v) => v.len(),
            ImageData::U32(v) => v.len(),
            ImageData::F32(v) => v.len(),
            ImageData::F64(v) => v.len(),
        }
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pixel element that can be summarized as `f64`
pub trait Sample: Copy + Send + Sync {
    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for u16 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for u32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Extremal values of a slice; each worker folds its own pair and the
/// pairs are reduced at the end.
fn slice_min_max<T: Sample>(data: &[T]) -> (f64, f64) {
    let Some(first) = data.first() else {
        return (0.0, 0.0);
    };
    let seed = first.to_f64();
    data.par_iter()
        .fold(
            || (seed, seed),
            |(lo, hi), &v| {
                let v = v.to_f64();
                (lo.min(v), hi.max(v))
            },
        )
        .reduce(|| (seed, seed), |a, b| (a.0.min(b.0), a.1.max(b.1)))
}

/// Dense typed image
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: ImageData,
}

impl Image {
    /// Create a zero-initialized image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 and
    /// [`Error::AllocationFailed`] if the buffer cannot be allocated.
    pub fn new(width: u32, height: u32, ty: ImageType) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize;
        Ok(Image {
            width,
            height,
            data: ImageData::zeroed(ty, len)?,
        })
    }

    /// Create an 8-bit image from a row-major byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if `data.len() != width * height`.
    pub fn from_u8(data: &[u8], width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize;
        if data.len() != len {
            return Err(Error::BufferSize {
                expected: len,
                actual: data.len(),
            });
        }
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| Error::AllocationFailed)?;
        buf.extend_from_slice(data);
        Ok(Image {
            width,
            height,
            data: ImageData::U8(buf),
        })
    }

    /// Wrap an existing typed buffer.
    pub fn from_data(width: u32, height: u32, data: ImageData) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize;
        if data.len() != len {
            return Err(Error::BufferSize {
                expected: len * data.image_type().pixel_bytes(),
                actual: data.len() * data.image_type().pixel_bytes(),
            });
        }
        Ok(Image {
            width,
            height,
            data,
        })
    }

    /// Create an empty image with the same size and type.
    pub fn similar(&self) -> Result<Self> {
        Image::new(self.width, self.height, self.image_type())
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

    #[inline]
    pub fn image_type(&self) -> ImageType {
        self.data.image_type()
    }

    /// Size of one pixel in bytes.
    #[inline]
    pub fn pixel_bytes(&self) -> usize {
        self.image_type().pixel_bytes()
    }

    #[inline]
    pub fn data(&self) -> &ImageData {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut ImageData {
        &mut self.data
    }

    /// Consume the image and return its pixel storage.
    pub fn into_data(self) -> ImageData {
        self.data
    }

    /// Borrow the pixels of an 8-bit image.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.data {
            ImageData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Mutably borrow the pixels of an 8-bit image.
    pub fn as_u8_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.data {
            ImageData::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the pixels of an 8-bit image or report the actual type.
    pub fn require_u8(&self) -> Result<&[u8]> {
        self.as_u8().ok_or(Error::UnsupportedType {
            expected: "u8",
            actual: self.image_type().name(),
        })
    }

    /// Minimum and maximum pixel value.
    pub fn min_max(&self) -> (f64, f64) {
        match &self.data {
            ImageData::U8(v) => slice_min_max(v),
            ImageData::U16(v) => slice_min_max(v),
            ImageData::U32(v) => slice_min_max(v),
            ImageData::F32(v) => slice_min_max(v),
            ImageData::F64(v) => slice_min_max(v),
        }
    }

    /// Check that `other` has the same width and height.
    pub fn check_same_size(&self, other: &Image) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }
}
