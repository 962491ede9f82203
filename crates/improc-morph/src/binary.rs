//! Binary morphological operations
//!
//! Implements erosion, dilation, opening, closing, top-hat and bottom-hat
//! for packed images with a fixed 3x3 cross structuring element.
//!
//! Every row of the output depends only on the same row and its two
//! vertical neighbours in the input, so rows are computed in parallel.
//! Each packed byte is first transformed through [`MaskTables`], then its
//! two edge bits are corrected from the adjacent bytes of the same row.

use crate::logic::and_not_bits;
use crate::masks::MaskTables;
use crate::{MorphError, MorphResult};
use improc_core::BitImage;
use rayon::prelude::*;

/// Erode a packed image once with the 3x3 cross.
///
/// A pixel survives iff it and its four neighbours are foreground. The
/// first and last rows, the first column and the last column are always
/// cleared because part of their neighbourhood lies outside the image.
///
/// # Errors
///
/// Returns [`improc_core::Error::TooSmall`] (wrapped) for images below 9x3.
pub fn erode(img: &BitImage) -> MorphResult<BitImage> {
    img.check_processable()?;
    let mut out = img.similar()?;
    erode_into(img, &mut out);
    Ok(out)
}

/// Dilate a packed image once with the 3x3 cross.
///
/// A pixel is set iff it or any of its four neighbours is foreground.
/// Pixels outside the image count as background.
pub fn dilate(img: &BitImage) -> MorphResult<BitImage> {
    img.check_processable()?;
    let mut out = img.similar()?;
    dilate_into(img, &mut out);
    Ok(out)
}

/// Erode `n` times.
pub fn erode_n(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    check_args(img, n)?;
    let mut buffers = PingPong::new(img)?;
    for _ in 0..n {
        buffers.step(erode_into);
    }
    Ok(buffers.into_front())
}

/// Dilate `n` times.
pub fn dilate_n(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    check_args(img, n)?;
    let mut buffers = PingPong::new(img)?;
    for _ in 0..n {
        buffers.step(dilate_into);
    }
    Ok(buffers.into_front())
}

/// Open a packed image: `n` erosions followed by `n` dilations.
///
/// Removes foreground specks and thin protrusions while keeping the rough
/// outline of larger shapes.
pub fn open(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    check_args(img, n)?;
    let eroded = erode_n(img, n)?;
    dilate_n(&eroded, n)
}

/// Close a packed image: `n` dilations followed by `n` erosions.
///
/// Fills small background holes and gaps.
pub fn close(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    check_args(img, n)?;
    let dilated = dilate_n(img, n)?;
    erode_n(&dilated, n)
}

/// Top-hat transform (original AND NOT opening)
///
/// Extracts foreground details smaller than the opened scale.
pub fn top_hat(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    let opened = open(img, n)?;
    and_not_bits(img, &opened)
}

/// Bottom-hat transform (closing AND NOT original)
///
/// Extracts background gaps smaller than the closed scale.
pub fn bottom_hat(img: &BitImage, n: u32) -> MorphResult<BitImage> {
    let closed = close(img, n)?;
    and_not_bits(&closed, img)
}

/// Two equally sized buffers for repeated single-step operations.
///
/// `front` always holds the latest result; a step writes into `back` and
/// exchanges the two.
struct PingPong {
    front: BitImage,
    back: BitImage,
}

impl PingPong {
    fn new(src: &BitImage) -> MorphResult<Self> {
        let mut front = src.similar()?;
        front.data_mut().copy_from_slice(src.data());
        let back = src.similar()?;
        Ok(PingPong { front, back })
    }

    fn step(&mut self, op: fn(&BitImage, &mut BitImage)) {
        op(&self.front, &mut self.back);
        std::mem::swap(&mut self.front, &mut self.back);
    }

    fn into_front(self) -> BitImage {
        self.front
    }
}

fn check_args(img: &BitImage, n: u32) -> MorphResult<()> {
    img.check_processable()?;
    if n < 1 {
        return Err(MorphError::InvalidIterations(n));
    }
    Ok(())
}

/// Single erosion step from `src` into `dst` (same geometry). Every output
/// byte is written.
fn erode_into(src: &BitImage, dst: &mut BitImage) {
    let er = &MaskTables::get().erosion;
    let stride = src.stride();
    let h = src.height() as usize;
    let last = stride - 1;
    // clears the last valid column together with the padding
    let last_mask = src.last_byte_mask() << 1;
    let data = src.data();

    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out)| {
            if y == 0 || y == h - 1 {
                out.fill(0);
                return;
            }
            let up = &data[(y - 1) * stride..y * stride];
            let cur = &data[y * stride..(y + 1) * stride];
            let down = &data[(y + 1) * stride..(y + 2) * stride];
            for i in 0..stride {
                let mut p = er[cur[i] as usize] & up[i] & down[i];
                if i == 0 || cur[i - 1] & 0x01 == 0 {
                    p &= 0x7f;
                }
                if i == last {
                    p &= last_mask;
                } else if cur[i + 1] & 0x80 == 0 {
                    p &= 0xfe;
                }
                out[i] = p;
            }
        });
}

/// Single dilation step from `src` into `dst` (same geometry). Every
/// output byte is written.
fn dilate_into(src: &BitImage, dst: &mut BitImage) {
    let dl = &MaskTables::get().dilation;
    let stride = src.stride();
    let h = src.height() as usize;
    let last = stride - 1;
    let valid_mask = src.last_byte_mask();
    let data = src.data();

    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, out)| {
            let cur = &data[y * stride..(y + 1) * stride];
            let up = (y > 0).then(|| &data[(y - 1) * stride..y * stride]);
            let down = (y + 1 < h).then(|| &data[(y + 1) * stride..(y + 2) * stride]);
            for i in 0..stride {
                let mut p = dl[cur[i] as usize];
                if let Some(up) = up {
                    p |= up[i];
                }
                if let Some(down) = down {
                    p |= down[i];
                }
                if i > 0 && cur[i - 1] & 0x01 != 0 {
                    p |= 0x80;
                }
                if i == last {
                    p &= valid_mask;
                } else if cur[i + 1] & 0x80 != 0 {
                    p |= 0x01;
                }
                out[i] = p;
            }
        });
}
