//! improc-test - Regression test framework for improc
//!
//! This crate provides [`RegParams`], which accumulates check results
//! instead of panicking at the first mismatch, and builders for synthetic
//! test images:
//!
//! - [`bit_image_from_rows`] - packed image from text rows
//! - [`bit_image_with_rects`] - packed image with filled rectangles
//! - [`random_bit_image`] / [`random_gray_image`] - seeded random images
//!
//! # Usage
//!
//! ```
//! use improc_test::{RegParams, bit_image_from_rows};
//!
//! let img = bit_image_from_rows(&[
//!     "..........",
//!     ".###......",
//!     "..........",
//! ])
//! .unwrap();
//!
//! let mut rp = RegParams::new("usage");
//! rp.compare_values(3.0, img.count_foreground() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use improc_core::{BitImage, Image};
use rand::prelude::*;

/// Build a packed image from text rows.
///
/// `#` and `1` are foreground, `.` and `0` background. All rows must have
/// the same length.
pub fn bit_image_from_rows(rows: &[&str]) -> TestResult<BitImage> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut img = BitImage::new(width as u32, rows.len() as u32)?;
    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(TestError::Pattern {
                row: y,
                message: format!("expected {} columns, got {}", width, row.chars().count()),
            });
        }
        for (x, c) in row.chars().enumerate() {
            let value = match c {
                '#' | '1' => true,
                '.' | '0' => false,
                other => {
                    return Err(TestError::Pattern {
                        row: y,
                        message: format!("unexpected character {:?}", other),
                    });
                }
            };
            if value {
                img.set_pixel(x as u32, y as u32, true)?;
            }
        }
    }
    Ok(img)
}

/// Render a packed image as text rows of `#` and `.`, one line per row.
pub fn bits_to_ascii(img: &BitImage) -> String {
    let mut out = String::with_capacity((img.width() as usize + 1) * img.height() as usize);
    for y in 0..img.height() {
        for x in 0..img.width() {
            out.push(if img.get_pixel_unchecked(x, y) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Build a `width` x `height` packed image with the given rectangles
/// `(x, y, w, h)` filled.
pub fn bit_image_with_rects(
    width: u32,
    height: u32,
    rects: &[(u32, u32, u32, u32)],
) -> TestResult<BitImage> {
    let mut img = BitImage::new(width, height)?;
    for &(x0, y0, w, h) in rects {
        if x0 + w > width || y0 + h > height {
            return Err(TestError::InvalidArgument(format!(
                "rectangle ({x0}, {y0}, {w}, {h}) exceeds {width}x{height}"
            )));
        }
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.set_pixel(x, y, true)?;
            }
        }
    }
    Ok(img)
}

/// Random packed image where each pixel is foreground with probability
/// `density`. The same seed always gives the same image.
pub fn random_bit_image(width: u32, height: u32, density: f64, seed: u64) -> TestResult<BitImage> {
    if !(0.0..=1.0).contains(&density) {
        return Err(TestError::InvalidArgument(format!(
            "density {density} outside 0..=1"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = BitImage::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            if rng.random_bool(density) {
                img.set_pixel(x, y, true)?;
            }
        }
    }
    Ok(img)
}

/// Random 8-bit image with uniformly distributed pixel values.
pub fn random_gray_image(width: u32, height: u32, seed: u64) -> TestResult<Image> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..width as usize * height as usize)
        .map(|_| rng.random::<u8>())
        .collect();
    Ok(Image::from_u8(&data, width, height)?)
}
