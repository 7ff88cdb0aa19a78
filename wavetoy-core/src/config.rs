//! Setup parameters, supplied by the outer configuration layer.

use crate::error::{Result, WaveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveToyConfig {
    /// Lower physical bound per axis.
    pub lo: [f64; 3],
    /// Upper physical bound per axis.
    pub hi: [f64; 3],
    /// Cells per axis.
    pub ncells: usize,
    /// Ghost width on every face of every patch.
    pub nghostzones: usize,
    pub periodic: [bool; 3],
    /// Longest patch edge, in cells.
    pub max_grid_size: usize,
    /// Time step factor: `dt = dtfac / ncells`.
    pub dtfac: f64,
}

impl Default for WaveToyConfig {
    fn default() -> Self {
        Self {
            lo: [0.0; 3],
            hi: [4.0; 3],
            ncells: 32,
            nghostzones: 1,
            periodic: [true; 3],
            max_grid_size: 16,
            dtfac: 0.5,
        }
    }
}

impl WaveToyConfig {
    /// Reject anything that would let the stencil read undefined memory.
    pub fn validate(&self) -> Result<()> {
        if self.ncells == 0 {
            return Err(WaveError::config("ncells must be > 0"));
        }
        if self.ncells > i32::MAX as usize / 4 {
            return Err(WaveError::config(format!("ncells={} is too large", self.ncells)));
        }
        for d in 0..3 {
            let (lo, hi) = (self.lo[d], self.hi[d]);
            if !lo.is_finite() || !hi.is_finite() {
                return Err(WaveError::config(format!("axis {d}: bounds must be finite")));
            }
            if hi <= lo {
                return Err(WaveError::config(format!(
                    "axis {d}: cell spacing must be positive (lo={lo}, hi={hi})"
                )));
            }
            if !self.periodic[d] {
                return Err(WaveError::config(format!(
                    "axis {d}: non-periodic boundaries need an explicit boundary condition, none is implemented"
                )));
            }
        }
        if self.nghostzones < 1 {
            return Err(WaveError::config("nghostzones must be >= 1"));
        }
        if self.nghostzones > self.ncells {
            return Err(WaveError::config(format!(
                "nghostzones={} exceeds ncells={}",
                self.nghostzones, self.ncells
            )));
        }
        if self.max_grid_size == 0 {
            return Err(WaveError::config("max_grid_size must be > 0"));
        }
        if !(self.dtfac.is_finite() && self.dtfac > 0.0) {
            return Err(WaveError::config("dtfac must be positive"));
        }
        Ok(())
    }

    pub fn delta_time(&self) -> f64 {
        self.dtfac / self.ncells as f64
    }
}
