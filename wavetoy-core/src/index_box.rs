//! Integer index boxes over the cell index space.
//!
//! Bounds are inclusive on both ends, so a box covering cells `0..n` has
//! `lo = 0` and `hi = n - 1` along that axis. Negative indices and indices
//! at or beyond `ncells` name ghost cells.

use serde::Serialize;

/// Axis-aligned box of cell indices, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexBox {
    pub lo: [i32; 3],
    pub hi: [i32; 3],
}

impl IndexBox {
    pub fn new(lo: [i32; 3], hi: [i32; 3]) -> Self {
        Self { lo, hi }
    }

    /// Box covering `[0, n)` along every axis.
    pub fn cube(n: usize) -> Self {
        let h = n as i32 - 1;
        Self::new([0; 3], [h; 3])
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|d| self.hi[d] < self.lo[d])
    }

    /// Number of cells along `axis`.
    #[inline]
    pub fn len(&self, axis: usize) -> usize {
        (self.hi[axis] - self.lo[axis] + 1).max(0) as usize
    }

    pub fn volume(&self) -> usize {
        self.len(0) * self.len(1) * self.len(2)
    }

    #[inline]
    pub fn contains(&self, cell: [i32; 3]) -> bool {
        (0..3).all(|d| cell[d] >= self.lo[d] && cell[d] <= self.hi[d])
    }

    /// Grow by `n` cells on every face.
    pub fn grow(&self, n: usize) -> Self {
        let n = n as i32;
        Self::new(
            [self.lo[0] - n, self.lo[1] - n, self.lo[2] - n],
            [self.hi[0] + n, self.hi[1] + n, self.hi[2] + n],
        )
    }

    pub fn shift(&self, offset: [i32; 3]) -> Self {
        Self::new(
            [
                self.lo[0] + offset[0],
                self.lo[1] + offset[1],
                self.lo[2] + offset[2],
            ],
            [
                self.hi[0] + offset[0],
                self.hi[1] + offset[1],
                self.hi[2] + offset[2],
            ],
        )
    }

    pub fn intersect(&self, other: &IndexBox) -> Option<IndexBox> {
        let b = IndexBox::new(
            [
                self.lo[0].max(other.lo[0]),
                self.lo[1].max(other.lo[1]),
                self.lo[2].max(other.lo[2]),
            ],
            [
                self.hi[0].min(other.hi[0]),
                self.hi[1].min(other.hi[1]),
                self.hi[2].min(other.hi[2]),
            ],
        );
        if b.is_empty() { None } else { Some(b) }
    }

    /// All cells of the box, x fastest, then y, then z.
    pub fn cells(self) -> impl Iterator<Item = [i32; 3]> {
        (self.lo[2]..=self.hi[2]).flat_map(move |k| {
            (self.lo[1]..=self.hi[1])
                .flat_map(move |j| (self.lo[0]..=self.hi[0]).map(move |i| [i, j, k]))
        })
    }

    /// Split into boxes of at most `max_size` cells per axis.
    ///
    /// Chunks are laid out x fastest, so the returned order is stable and can
    /// be used as a patch id.
    pub fn chop(&self, max_size: usize) -> Vec<IndexBox> {
        let max_size = max_size.max(1) as i32;
        let ranges: Vec<Vec<(i32, i32)>> = (0..3)
            .map(|d| {
                let mut out = Vec::new();
                let mut lo = self.lo[d];
                while lo <= self.hi[d] {
                    let hi = (lo + max_size - 1).min(self.hi[d]);
                    out.push((lo, hi));
                    lo = hi + 1;
                }
                out
            })
            .collect();

        let mut boxes = Vec::with_capacity(ranges[0].len() * ranges[1].len() * ranges[2].len());
        for &(zlo, zhi) in &ranges[2] {
            for &(ylo, yhi) in &ranges[1] {
                for &(xlo, xhi) in &ranges[0] {
                    boxes.push(IndexBox::new([xlo, ylo, zlo], [xhi, yhi, zhi]));
                }
            }
        }
        boxes
    }
}
