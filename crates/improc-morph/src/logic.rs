//! Pixelwise logical operations
//!
//! AND and AND-NOT between two images of identical size, either dense
//! 8-bit images or packed images. Operands are size-checked; a mismatch
//! is reported as [`improc_core::Error::DimensionMismatch`].

use crate::MorphResult;
use improc_core::{BitImage, Error, Image, ImageData, try_alloc};
use rayon::prelude::*;

fn combine(a: &[u8], b: &[u8], op: impl Fn(u8, u8) -> u8 + Sync) -> MorphResult<Vec<u8>> {
    let mut out: Vec<u8> = try_alloc(a.len())?;
    out.par_iter_mut()
        .zip(a.par_iter().zip(b.par_iter()))
        .for_each(|(o, (&x, &y))| *o = op(x, y));
    Ok(out)
}

fn combine_dense(a: &Image, b: &Image, op: impl Fn(u8, u8) -> u8 + Sync) -> MorphResult<Image> {
    a.check_same_size(b)?;
    let pa = a.require_u8()?;
    let pb = b.require_u8()?;
    let out = combine(pa, pb, op)?;
    Ok(Image::from_data(a.width(), a.height(), ImageData::U8(out))?)
}

fn combine_bits(
    a: &BitImage,
    b: &BitImage,
    op: impl Fn(u8, u8) -> u8 + Sync,
) -> MorphResult<BitImage> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        }
        .into());
    }
    let out = combine(a.data(), b.data(), op)?;
    Ok(BitImage::from_bytes(a.width(), a.height(), out)?)
}

/// Pixelwise `a & b` of two 8-bit images.
pub fn and(a: &Image, b: &Image) -> MorphResult<Image> {
    combine_dense(a, b, |x, y| x & y)
}

/// Pixelwise `a & !b` of two 8-bit images: clears in `a` every bit set
/// in `b`.
pub fn and_not(a: &Image, b: &Image) -> MorphResult<Image> {
    combine_dense(a, b, |x, y| x & !y)
}

/// Intersection of two packed images.
pub fn and_bits(a: &BitImage, b: &BitImage) -> MorphResult<BitImage> {
    combine_bits(a, b, |x, y| x & y)
}

/// Pixels of `a` that are not set in `b`.
pub fn and_not_bits(a: &BitImage, b: &BitImage) -> MorphResult<BitImage> {
    combine_bits(a, b, |x, y| x & !y)
}
