//! Byte lookup tables for the 3x3 cross kernel
//!
//! Each table maps one packed byte (8 horizontally adjacent pixels) to the
//! result of a horizontal erosion or dilation restricted to that byte.
//! Neighbours across byte boundaries and across rows are resolved by the
//! callers in [`crate::binary`].

use std::sync::OnceLock;

/// Erosion and dilation masks, indexed by packed byte value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskTables {
    /// Bit kept iff it and both in-byte horizontal neighbours are set.
    /// Bits shifted in at the byte edges count as set.
    pub erosion: [u8; 256],
    /// Bit set iff it or either in-byte horizontal neighbour is set.
    pub dilation: [u8; 256],
}

static TABLES: OnceLock<MaskTables> = OnceLock::new();

impl MaskTables {
    /// Compute both tables.
    pub fn build() -> Self {
        let mut erosion = [0u8; 256];
        let mut dilation = [0u8; 256];
        for v in 0..=255u8 {
            erosion[v as usize] = v & ((v << 1) | 0x01) & ((v >> 1) | 0x80);
            dilation[v as usize] = v | (v << 1) | (v >> 1);
        }
        MaskTables { erosion, dilation }
    }

    /// Process-wide tables, built on first use.
    pub fn get() -> &'static MaskTables {
        TABLES.get_or_init(|| {
            log::debug!("building erosion/dilation mask tables");
            MaskTables::build()
        })
    }
}
