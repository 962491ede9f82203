//! Connected component labeling
//!
//! 4-connected labeling of packed binary images in two passes:
//!
//! 1. A sequential raster scan assigns provisional labels, inheriting the
//!    label of the pixel above or to the left and recording merges in an
//!    [`EquivalenceTable`].
//! 2. Provisional labels are compacted to `1..count` and rewritten in
//!    parallel over rows; each worker accumulates bounding boxes and areas
//!    into its own table and the tables are merged at the end.
//!
//! The input is first passed through [`improc_morph::filter_4`], so
//! foreground pixels without any 4-connected foreground neighbour are
//! treated as background and get label 0.

use crate::equivalence::EquivalenceTable;
use crate::{RegionError, RegionResult};
use improc_core::BitImage;
use improc_morph::filter_4;
use rayon::prelude::*;

/// Per-pixel component labels, row-major, `width * height` entries.
///
/// Label 0 is background; components are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelArray {
    width: u32,
    height: u32,
    labels: Vec<usize>,
}

impl LabelArray {
    /// Wrap an existing label buffer.
    pub fn from_vec(width: u32, height: u32, labels: Vec<usize>) -> RegionResult<Self> {
        let expected = width as usize * height as usize;
        if labels.len() != expected {
            return Err(improc_core::Error::BufferSize {
                expected,
                actual: labels.len(),
            }
            .into());
        }
        Ok(LabelArray {
            width,
            height,
            labels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Label at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.labels[y as usize * self.width as usize + x as usize])
    }

    /// Labels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[usize] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.labels[start..start + w]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.labels
    }

    /// Largest label present (0 for an all-background array).
    pub fn max_label(&self) -> usize {
        self.labels.par_iter().copied().max().unwrap_or(0)
    }
}

/// Bounding box and pixel count of one component.
///
/// Coordinates are inclusive. An empty box has `area == 0`, its minima at
/// `u32::MAX` and maxima at 0, which makes it the identity of
/// [`ComponentBox::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentBox {
    pub xmin: u32,
    pub xmax: u32,
    pub ymin: u32,
    pub ymax: u32,
    pub area: u64,
}

impl Default for ComponentBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ComponentBox {
    /// Box covering no pixels.
    pub const EMPTY: ComponentBox = ComponentBox {
        xmin: u32::MAX,
        xmax: 0,
        ymin: u32::MAX,
        ymax: 0,
        area: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.area == 0
    }

    /// Grow the box to cover pixel `(x, y)`.
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
        self.area += 1;
    }

    /// Combine two partial boxes of the same component.
    pub fn merge(&self, other: &ComponentBox) -> ComponentBox {
        ComponentBox {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
            area: self.area + other.area,
        }
    }

    /// Width in pixels, 0 when empty.
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.xmax - self.xmin + 1
        }
    }

    /// Height in pixels, 0 when empty.
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.ymax - self.ymin + 1
        }
    }
}

/// Component boxes indexed by label.
///
/// Entry 0 is a placeholder for background and is always empty, so
/// [`count`](Self::count) is the number of components plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponents {
    boxes: Vec<ComponentBox>,
}

impl ConnectedComponents {
    /// Measure the components of a finished label array.
    pub fn from_labels(labels: &LabelArray) -> RegionResult<Self> {
        Self::from_labels_partitioned(labels, 1)
    }

    /// Measure the components of a finished label array, handing
    /// `rows_per_part` rows to each worker. The result does not depend on
    /// the partitioning.
    pub fn from_labels_partitioned(
        labels: &LabelArray,
        rows_per_part: usize,
    ) -> RegionResult<Self> {
        if rows_per_part == 0 {
            return Err(RegionError::InvalidParameters(
                "rows_per_part must be at least 1".to_string(),
            ));
        }
        let n = labels.max_label() + 1;
        let w = labels.width as usize;
        if w == 0 || labels.height == 0 {
            return Ok(ConnectedComponents {
                boxes: vec![ComponentBox::EMPTY],
            });
        }
        // w * rows_per_part must not overflow
        let rows_per_part = rows_per_part.min(labels.height as usize);
        let boxes = labels
            .labels
            .par_chunks(w * rows_per_part)
            .enumerate()
            .fold(
                || vec![ComponentBox::EMPTY; n],
                |mut acc, (part, chunk)| {
                    accumulate_rows(&mut acc, chunk, w, part * rows_per_part);
                    acc
                },
            )
            .reduce(|| vec![ComponentBox::EMPTY; n], merge_tables);
        Ok(ConnectedComponents { boxes })
    }

    /// Number of entries, including the background placeholder.
    pub fn count(&self) -> usize {
        self.boxes.len()
    }

    /// Number of components (background excluded).
    pub fn num_components(&self) -> usize {
        self.boxes.len() - 1
    }

    /// Box of component `label`; `None` for background or out of range.
    pub fn get(&self, label: usize) -> Option<&ComponentBox> {
        if label == 0 {
            return None;
        }
        self.boxes.get(label)
    }

    /// `(label, box)` for every component, in label order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ComponentBox)> {
        self.boxes.iter().enumerate().skip(1)
    }

    /// All entries including the placeholder at index 0.
    pub fn boxes(&self) -> &[ComponentBox] {
        &self.boxes
    }
}

/// Add the labeled pixels of `rows` (starting at image row `y0`) to `acc`.
fn accumulate_rows(acc: &mut [ComponentBox], rows: &[usize], width: usize, y0: usize) {
    for (dy, row) in rows.chunks(width).enumerate() {
        let y = (y0 + dy) as u32;
        for (x, &label) in row.iter().enumerate() {
            if label != 0 {
                acc[label].include(x as u32, y);
            }
        }
    }
}

fn merge_tables(mut a: Vec<ComponentBox>, b: Vec<ComponentBox>) -> Vec<ComponentBox> {
    for (x, y) in a.iter_mut().zip(&b) {
        *x = x.merge(y);
    }
    a
}

/// First pass: provisional labels with merges recorded in `table`.
fn raster_scan(
    labels: &mut [usize],
    width: usize,
    table: &mut EquivalenceTable,
) -> RegionResult<()> {
    for y in 0..labels.len() / width {
        let (above, rest) = labels.split_at_mut(y * width);
        let row = &mut rest[..width];
        let prev = (y > 0).then(|| &above[(y - 1) * width..]);
        // label of the run the scan is currently in, 0 outside a run
        let mut run = 0;
        for x in 0..width {
            if row[x] == 0 {
                run = 0;
                continue;
            }
            let up = prev.map_or(0, |p| p[x]);
            if run != 0 {
                if up != 0 && up != run {
                    table.union(up, run);
                    run = up;
                }
            } else if up != 0 {
                run = up;
            } else {
                run = table.new_label()?;
            }
            row[x] = run;
        }
    }
    Ok(())
}

fn label_image(img: &BitImage) -> RegionResult<(LabelArray, Vec<ComponentBox>)> {
    img.check_processable()?;
    let filtered = filter_4(img)?;
    let w = img.width() as usize;
    let mut labels = filtered.to_label_buffer()?;

    let mut table = EquivalenceTable::new();
    raster_scan(&mut labels, w, &mut table)?;
    let compact = table.compactify()?;
    let n = compact.iter().copied().max().unwrap_or(0) + 1;

    let boxes = labels
        .par_chunks_mut(w)
        .enumerate()
        .fold(
            || vec![ComponentBox::EMPTY; n],
            |mut acc, (y, row)| {
                for (x, label) in row.iter_mut().enumerate() {
                    if *label != 0 {
                        *label = compact[*label];
                        acc[*label].include(x as u32, y as u32);
                    }
                }
                acc
            },
        )
        .reduce(|| vec![ComponentBox::EMPTY; n], merge_tables);

    log::debug!(
        "labeled {}x{}: {} provisional labels, {} components",
        img.width(),
        img.height(),
        table.len(),
        n - 1
    );

    let labels = LabelArray::from_vec(img.width(), img.height(), labels)?;
    Ok((labels, boxes))
}

/// Label the 4-connected components of `img`.
///
/// Returns the label array and the per-label boxes. Components are
/// numbered from 1 in order of their first pixel in raster order.
/// Foreground pixels with no 4-connected foreground neighbour are
/// treated as background.
///
/// # Errors
///
/// Returns [`improc_core::Error::TooSmall`] (wrapped) for images below
/// [`improc_core::MIN_WIDTH`] x [`improc_core::MIN_HEIGHT`].
pub fn label_4_connected(img: &BitImage) -> RegionResult<(LabelArray, ConnectedComponents)> {
    let (labels, boxes) = label_image(img)?;
    Ok((labels, ConnectedComponents { boxes }))
}

/// Like [`label_4_connected`] but returns only the label array.
pub fn label_4_connected_labels(img: &BitImage) -> RegionResult<LabelArray> {
    label_image(img).map(|(labels, _)| labels)
}
