//! improc-core - Basic data structures for image processing
//!
//! This crate provides the image containers shared by the morphology and
//! labeling crates:
//!
//! - [`Image`] - dense typed image (u8, u16, u32, f32, f64 pixels)
//! - [`BitImage`] - packed 1-bit-per-pixel image, MSB first
//! - [`ColorImage`] - 3-channel byte image for colour rendering
//!
//! Conversion between dense 8-bit images and packed images is done with
//! [`BitImage::pack`] and [`BitImage::unpack`].

pub mod bitimage;
pub mod color;
pub mod error;
pub mod image;

pub use bitimage::{BitImage, MIN_HEIGHT, MIN_WIDTH, check_min_size, stride_for};
pub use color::{ColorImage, Rgb};
pub use error::{Error, Result, try_alloc};
pub use image::{Image, ImageData, ImageType, Sample};
