//! improc - Binary morphology and connected component labeling
//!
//! Packed 1-bit images ([`BitImage`]) are produced from 8-bit images by
//! thresholding, processed with 3x3 cross-kernel morphology and labeled
//! into 4-connected components.
//!
//! # Example
//!
//! ```
//! use improc::{BitImage, Image};
//! use improc::morph::open;
//! use improc::region::label_4_connected;
//!
//! // two bright squares on a dark background
//! let mut pixels = vec![0u8; 20 * 10];
//! for y in 1..5 {
//!     for x in 1..5 {
//!         pixels[y * 20 + x] = 200;
//!         pixels[(y + 4) * 20 + x + 12] = 200;
//!     }
//! }
//! let gray = Image::from_u8(&pixels, 20, 10).unwrap();
//!
//! let bits = BitImage::pack(&gray, 128.0).unwrap();
//! let cleaned = open(&bits, 1).unwrap();
//! let (_, components) = label_4_connected(&cleaned).unwrap();
//! assert_eq!(components.num_components(), 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use improc_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use improc_morph as morph;
pub use improc_region as region;
