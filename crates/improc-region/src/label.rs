//! Helpers on labeled images
//!
//! Extraction and area filtering of components, and a colour rendering of
//! a label array for visual inspection.

use crate::conncomp::{ConnectedComponents, LabelArray};
use crate::{RegionError, RegionResult};
use improc_core::{BitImage, ColorImage, Rgb, stride_for};
use rayon::prelude::*;

/// Packed image with the pixels of `labels` for which `keep` holds.
fn select_pixels(
    labels: &LabelArray,
    keep: impl Fn(usize) -> bool + Sync,
) -> RegionResult<BitImage> {
    let mut out = BitImage::new(labels.width(), labels.height())?;
    let w = labels.width() as usize;
    out.data_mut()
        .par_chunks_mut(stride_for(labels.width()))
        .zip(labels.as_slice().par_chunks(w))
        .for_each(|(dst, row)| {
            for (x, &label) in row.iter().enumerate() {
                if label != 0 && keep(label) {
                    dst[x / 8] |= 0x80 >> (x % 8);
                }
            }
        });
    Ok(out)
}

/// Binary mask of a single component.
///
/// A label beyond the highest one in the array yields an empty image.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] for label 0 (background).
pub fn extract_component(labels: &LabelArray, label: usize) -> RegionResult<BitImage> {
    if label == 0 {
        return Err(RegionError::InvalidParameters(
            "label 0 is background".to_string(),
        ));
    }
    select_pixels(labels, |l| l == label)
}

/// Binary mask of every component whose area lies in `min..=max`.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] if `min > max`.
pub fn filter_by_area(
    labels: &LabelArray,
    components: &ConnectedComponents,
    min: u64,
    max: u64,
) -> RegionResult<BitImage> {
    if min > max {
        return Err(RegionError::InvalidParameters(format!(
            "min area {min} exceeds max area {max}"
        )));
    }
    let kept = components
        .iter()
        .filter(|(_, b)| (min..=max).contains(&b.area))
        .count();
    log::debug!(
        "filter_by_area {min}..={max}: keeping {kept} of {} components",
        components.iter().count()
    );
    select_pixels(labels, |l| {
        components
            .get(l)
            .is_some_and(|b| (min..=max).contains(&b.area))
    })
}

/// Deterministic colour for a component label; background is black.
///
/// Channels stay in `64..=255` so every component is visible on black.
pub fn label_color(label: usize) -> Rgb {
    if label == 0 {
        return improc_core::color::BLACK;
    }
    // multiplicative hash spreads consecutive labels apart
    let h = (label as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    let channel = |shift: u32| 64 + ((h >> shift) & 0xff) as u8 % 192;
    [channel(56), channel(40), channel(24)]
}

/// Render a label array as a colour image, one colour per component.
pub fn render_components(labels: &LabelArray) -> RegionResult<ColorImage> {
    let mut out = ColorImage::new(labels.width(), labels.height())?;
    let w = labels.width() as usize;
    out.data_mut()
        .par_chunks_mut(w * 3)
        .zip(labels.as_slice().par_chunks(w))
        .for_each(|(dst, row)| {
            for (px, &label) in dst.chunks_exact_mut(3).zip(row) {
                px.copy_from_slice(&label_color(label));
            }
        });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conncomp::label_4_connected;

    fn labeled() -> (LabelArray, ConnectedComponents) {
        // 3x3 square, 2x5 bar, 4x1 line
        let mut img = BitImage::new(16, 8).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                img.set_pixel(x, y, true).unwrap();
            }
        }
        for y in 2..7 {
            for x in 7..9 {
                img.set_pixel(x, y, true).unwrap();
            }
        }
        for x in 11..15 {
            img.set_pixel(x, 6, true).unwrap();
        }
        label_4_connected(&img).unwrap()
    }

    #[test]
    fn test_extract_component() {
        let (labels, cc) = labeled();
        let bar = labels.get(7, 2).unwrap();
        let img = extract_component(&labels, bar).unwrap();
        assert_eq!(img.count_foreground(), 10);
        assert_eq!(img.get_pixel(8, 6), Some(true));
        assert_eq!(img.get_pixel(2, 2), Some(false));

        let none = extract_component(&labels, cc.count() + 5).unwrap();
        assert!(none.is_empty());
        assert!(extract_component(&labels, 0).is_err());
    }

    #[test]
    fn test_filter_by_area() {
        let (labels, cc) = labeled();
        assert_eq!(cc.num_components(), 3);
        let mid = filter_by_area(&labels, &cc, 5, 9).unwrap();
        assert_eq!(mid.count_foreground(), 9);
        let all = filter_by_area(&labels, &cc, 0, u64::MAX).unwrap();
        assert_eq!(all.count_foreground(), 9 + 10 + 4);
        let small = filter_by_area(&labels, &cc, 4, 4).unwrap();
        assert_eq!(small.get_pixel(12, 6), Some(true));
        assert_eq!(small.count_foreground(), 4);
        assert!(filter_by_area(&labels, &cc, 10, 2).is_err());
    }

    #[test]
    fn test_render_components() {
        let (labels, _) = labeled();
        let img = render_components(&labels).unwrap();
        assert_eq!(img.get_rgb(0, 0), Some([0, 0, 0]));
        let square = img.get_rgb(2, 2).unwrap();
        assert_eq!(img.get_rgb(3, 3), Some(square));
        assert_ne!(img.get_rgb(7, 4), Some(square));
        assert!(square.iter().all(|&c| c >= 64));
    }

    #[test]
    fn test_label_colors_distinct() {
        let colors: Vec<Rgb> = (1..=16).map(label_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
