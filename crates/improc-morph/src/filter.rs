//! Connectivity filters
//!
//! Prune foreground pixels that are not connected to any other foreground
//! pixel:
//!
//! - [`filter_4`] keeps a pixel iff at least one of its 4 edge neighbours
//!   is foreground
//! - [`filter_8`] keeps a pixel iff at least one of its 8 neighbours
//!   (edges and corners) is foreground, i.e. removes isolated points
//!
//! Unlike erosion these are not kernel operators: a pixel survives with
//! a single neighbour, not a complete neighbourhood. The filters work on
//! packed images; [`filter_4_gray`] and [`filter_8_gray`] wrap them for
//! dense 8-bit images with 0/255 pixels.

use crate::MorphResult;
use improc_core::{BitImage, Image};
use rayon::prelude::*;

/// Which neighbourhood a pixel must touch to survive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighborhood {
    Four,
    Eight,
}

/// Bits whose left neighbour is set, bringing in bit 0 of the previous byte.
#[inline]
fn left_neighbors(row: &[u8], i: usize) -> u8 {
    let carry = if i > 0 { (row[i - 1] & 0x01) << 7 } else { 0 };
    (row[i] >> 1) | carry
}

/// Bits whose right neighbour is set, bringing in bit 7 of the next byte.
#[inline]
fn right_neighbors(row: &[u8], i: usize) -> u8 {
    let carry = if i + 1 < row.len() { row[i + 1] >> 7 } else { 0 };
    (row[i] << 1) | carry
}

/// Bits with the pixel itself or a horizontal neighbour set.
#[inline]
fn spread(row: &[u8], i: usize) -> u8 {
    row[i] | left_neighbors(row, i) | right_neighbors(row, i)
}

/// Filter one row. `up` is `None` on the top row and `down` is `None` on
/// the bottom row; missing rows contribute no neighbours.
fn filter_row(
    up: Option<&[u8]>,
    cur: &[u8],
    down: Option<&[u8]>,
    out: &mut [u8],
    neighborhood: Neighborhood,
) {
    for i in 0..cur.len() {
        if cur[i] == 0 {
            out[i] = 0;
            continue;
        }
        let mut neighbors = left_neighbors(cur, i) | right_neighbors(cur, i);
        for row in [up, down].into_iter().flatten() {
            neighbors |= match neighborhood {
                Neighborhood::Four => row[i],
                Neighborhood::Eight => spread(row, i),
            };
        }
        out[i] = cur[i] & neighbors;
    }
}

fn filter_bits(img: &BitImage, neighborhood: Neighborhood) -> MorphResult<BitImage> {
    img.check_processable()?;
    let mut out = img.similar()?;
    let stride = img.stride();
    let h = img.height() as usize;
    let data = img.data();
    out.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| {
            let cur = &data[y * stride..(y + 1) * stride];
            let up = (y > 0).then(|| &data[(y - 1) * stride..y * stride]);
            let down = (y + 1 < h).then(|| &data[(y + 1) * stride..(y + 2) * stride]);
            filter_row(up, cur, down, dst, neighborhood);
        });
    Ok(out)
}

/// Remove every foreground pixel without a 4-connected foreground
/// neighbour.
///
/// Pixels that touch other foreground only at a corner are removed.
pub fn filter_4(img: &BitImage) -> MorphResult<BitImage> {
    filter_bits(img, Neighborhood::Four)
}

/// Remove isolated foreground points (no foreground among the 8
/// neighbours).
pub fn filter_8(img: &BitImage) -> MorphResult<BitImage> {
    filter_bits(img, Neighborhood::Eight)
}

fn filter_gray(img: &Image, neighborhood: Neighborhood) -> MorphResult<Image> {
    img.require_u8()?;
    improc_core::check_min_size(img.width(), img.height())?;
    let bits = BitImage::pack(img, 0.0)?;
    let filtered = filter_bits(&bits, neighborhood)?;
    Ok(filtered.unpack()?)
}

/// [`filter_4`] for a dense 8-bit image; nonzero pixels are foreground and
/// the result holds 0 or 255.
pub fn filter_4_gray(img: &Image) -> MorphResult<Image> {
    filter_gray(img, Neighborhood::Four)
}

/// [`filter_8`] for a dense 8-bit image; nonzero pixels are foreground and
/// the result holds 0 or 255.
pub fn filter_8_gray(img: &Image) -> MorphResult<Image> {
    filter_gray(img, Neighborhood::Eight)
}
