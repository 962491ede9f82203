//! Label equivalence table (union-find)
//!
//! Maps every provisional ("raw") label produced by the raster scan to a
//! parent label. A label whose parent is itself is the root of its
//! equivalence class. Roots are always the smallest label of their class
//! because [`EquivalenceTable::union`] points the larger root at the
//! smaller one, so `parent[l] <= l` holds for every label.
//!
//! Label 0 is reserved for background and is never merged.

use crate::RegionResult;
use improc_core::{Error, try_alloc};

/// Union-find table over raw labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceTable {
    parent: Vec<usize>,
}

impl Default for EquivalenceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EquivalenceTable {
    /// Create a table holding only the background label.
    pub fn new() -> Self {
        EquivalenceTable { parent: vec![0] }
    }

    /// Number of raw labels allocated so far (background excluded).
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    /// Whether no raw label has been allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate the next raw label as the root of a new class.
    pub fn new_label(&mut self) -> RegionResult<usize> {
        let label = self.parent.len();
        self.parent
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailed)?;
        self.parent.push(label);
        Ok(label)
    }

    /// Root of the class containing `label`.
    ///
    /// # Panics
    ///
    /// Panics if `label` was never allocated.
    pub fn find(&self, mut label: usize) -> usize {
        while self.parent[label] != label {
            label = self.parent[label];
        }
        label
    }

    /// Merge the classes of `a` and `b`; returns the surviving root, which
    /// is the smaller of the two roots.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb] = ra;
            ra
        } else {
            self.parent[ra] = rb;
            rb
        }
    }

    /// Whether `a` and `b` belong to the same class.
    pub fn same_class(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Assign compact ids 1, 2, 3... to the classes in order of their roots
    /// and return the raw-to-compact map (entry 0 maps background to 0).
    ///
    /// Each parent pointer is compressed to point straight at its root.
    pub fn compactify(&mut self) -> RegionResult<Vec<usize>> {
        let mut compact: Vec<usize> = try_alloc(self.parent.len())?;
        let mut next = 1;
        for label in 1..self.parent.len() {
            let root = self.find(label);
            self.parent[label] = root;
            if compact[root] == 0 {
                compact[root] = next;
                next += 1;
            }
            compact[label] = compact[root];
        }
        Ok(compact)
    }
}
