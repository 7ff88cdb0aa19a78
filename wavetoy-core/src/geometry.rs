//! Physical geometry of the cell-centred domain.

use crate::analytic::linterp;
use crate::config::WaveToyConfig;
use crate::index_box::IndexBox;
use serde::Serialize;

/// Stability limit of the 3-D seven-point leapfrog scheme on a cubic grid.
pub const COURANT_LIMIT_3D: f64 = 0.577_350_269_189_625_8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Domain {
    pub lo: [f64; 3],
    pub hi: [f64; 3],
    pub ncells: usize,
    pub nghostzones: usize,
    pub periodic: [bool; 3],
}

impl Domain {
    pub fn from_config(cfg: &WaveToyConfig) -> Self {
        Self {
            lo: cfg.lo,
            hi: cfg.hi,
            ncells: cfg.ncells,
            nghostzones: cfg.nghostzones,
            periodic: cfg.periodic,
        }
    }

    /// Cell spacing per axis.
    pub fn dx(&self) -> [f64; 3] {
        let n = self.ncells as f64;
        [
            (self.hi[0] - self.lo[0]) / n,
            (self.hi[1] - self.lo[1]) / n,
            (self.hi[2] - self.lo[2]) / n,
        ]
    }

    pub fn min_dx(&self) -> f64 {
        let dx = self.dx();
        dx[0].min(dx[1]).min(dx[2])
    }

    /// Cell-centre coordinate of the first interior cell.
    pub fn origin(&self) -> [f64; 3] {
        let dx = self.dx();
        [
            self.lo[0] + 0.5 * dx[0],
            self.lo[1] + 0.5 * dx[1],
            self.lo[2] + 0.5 * dx[2],
        ]
    }

    /// Box of all interior cells, `[0, ncells)` per axis.
    pub fn cell_box(&self) -> IndexBox {
        IndexBox::cube(self.ncells)
    }

    /// Physical coordinate of cell index `i` along `axis`.
    ///
    /// Interpolates between the synthetic endpoints `-1 -> lo` and
    /// `2 ncells - 1 -> hi` at `2 i`, which lands on the cell centre. Ghost
    /// indices extrapolate with the same line.
    #[inline]
    pub fn coord(&self, axis: usize, i: i32) -> f64 {
        let n = self.ncells as f64;
        linterp(
            self.lo[axis],
            self.hi[axis],
            -1.0,
            2.0 * n - 1.0,
            2.0 * i as f64,
        )
    }

    #[inline]
    pub fn position(&self, cell: [i32; 3]) -> [f64; 3] {
        [
            self.coord(0, cell[0]),
            self.coord(1, cell[1]),
            self.coord(2, cell[2]),
        ]
    }

    /// `dt / min(dx)`.
    pub fn courant_number(&self, dt: f64) -> f64 {
        dt / self.min_dx()
    }
}
