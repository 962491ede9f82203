//! improc-morph - Binary morphology for packed images
//!
//! This crate provides:
//!
//! - Lookup tables for the 3x3 cross kernel ([`MaskTables`])
//! - Binary morphology: erosion, dilation, their N-times variants,
//!   opening, closing, top-hat and bottom-hat
//! - Connectivity filters removing pixels without 4- or 8-connected
//!   neighbours
//! - Pixelwise AND / AND-NOT for dense and packed images
//!
//! All operations take an image by reference and return a newly allocated
//! result; inputs are never modified. Images smaller than
//! [`improc_core::MIN_WIDTH`] x [`improc_core::MIN_HEIGHT`] are rejected.
//!
//! # Examples
//!
//! ```
//! use improc_core::BitImage;
//! use improc_morph::{dilate, erode};
//!
//! let mut img = BitImage::new(16, 8).unwrap();
//! img.set_pixel(8, 4, true).unwrap();
//! let grown = dilate(&img).unwrap();
//! assert_eq!(grown.count_foreground(), 5);
//! assert_eq!(erode(&grown).unwrap().count_foreground(), 1);
//! ```

pub mod binary;
mod error;
pub mod filter;
pub mod logic;
pub mod masks;

pub use error::{MorphError, MorphResult};
pub use masks::MaskTables;

pub use binary::{bottom_hat, close, dilate, dilate_n, erode, erode_n, open, top_hat};
pub use filter::{filter_4, filter_4_gray, filter_8, filter_8_gray};
pub use logic::{and, and_bits, and_not, and_not_bits};
