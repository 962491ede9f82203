//! improc-region - Connected component labeling
//!
//! This crate provides:
//!
//! - **4-connected labeling** of packed images ([`label_4_connected`]),
//!   producing a per-pixel [`LabelArray`] and per-component
//!   [`ComponentBox`]es
//! - **Label equivalence** bookkeeping ([`EquivalenceTable`])
//! - **Helpers** to extract or area-filter components and to render a
//!   label array in colour
//!
//! # Examples
//!
//! ```
//! use improc_core::BitImage;
//! use improc_region::label_4_connected;
//!
//! let mut img = BitImage::new(16, 8).unwrap();
//! for y in 1..4 {
//!     for x in 1..4 {
//!         img.set_pixel(x, y, true).unwrap();
//!         img.set_pixel(x + 8, y + 3, true).unwrap();
//!     }
//! }
//!
//! let (labels, components) = label_4_connected(&img).unwrap();
//! assert_eq!(components.count(), 3);
//! assert_eq!(labels.get(9, 4), Some(2));
//! assert_eq!(components.get(1).unwrap().area, 9);
//! ```

pub mod conncomp;
pub mod equivalence;
mod error;
pub mod label;

pub use conncomp::{
    ComponentBox, ConnectedComponents, LabelArray, label_4_connected, label_4_connected_labels,
};
pub use equivalence::EquivalenceTable;
pub use error::{RegionError, RegionResult};
pub use label::{extract_component, filter_by_area, label_color, render_components};
