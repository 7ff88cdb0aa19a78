//! Ghost-zone exchange between patches, including periodic wrap-around.
//!
//! The set of transfers depends only on the decomposition, so it is computed
//! once. A fill runs in two phases: gather every ghost value from an immutable
//! view of all patches, then scatter into each patch's ghost region. Gathers
//! only read interior cells and scatters only write ghost cells, so the split
//! is the barrier between "all interiors final" and "ghosts refreshed".

use crate::field::MultiField;
use crate::geometry::Domain;
use crate::index_box::IndexBox;
use crate::patch::{NCOMPONENTS, Patch};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One rectangular copy into a patch's ghost region.
#[derive(Debug, Clone, PartialEq)]
struct Transfer {
    src: usize,
    /// Destination cells, in the destination patch's index space.
    region: IndexBox,
    /// Source cell = destination cell - shift.
    shift: [i32; 3],
}

#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Transfers per destination patch id.
    transfers: Vec<Vec<Transfer>>,
}

impl SyncPlan {
    pub fn new(domain: &Domain, field: &MultiField) -> Self {
        let n = domain.ncells as i32;
        let shifts = periodic_shifts(n, domain.periodic);

        let transfers = field
            .patches()
            .iter()
            .map(|dst| {
                let mut out = Vec::new();
                for src in field.patches() {
                    for &shift in &shifts {
                        if src.id() == dst.id() && shift == [0, 0, 0] {
                            continue;
                        }
                        let image = src.valid_box().shift(shift);
                        if let Some(region) = dst.fab_box().intersect(&image) {
                            out.push(Transfer {
                                src: src.id(),
                                region,
                                shift,
                            });
                        }
                    }
                }
                out
            })
            .collect();

        Self { transfers }
    }

    /// Ghost cells this plan refreshes, summed over all patches.
    pub fn ghost_cells(&self) -> usize {
        self.transfers
            .iter()
            .flatten()
            .map(|t| t.region.volume())
            .sum()
    }

    /// Refresh every ghost cell of every component from its owner.
    ///
    /// Idempotent: a second call without intervening writes changes nothing.
    pub fn fill_boundary(&self, field: &mut MultiField) {
        let patches = field.patches();

        #[cfg(feature = "parallel")]
        let buffers: Vec<Vec<f64>> = self
            .transfers
            .par_iter()
            .map(|ts| gather(ts, patches))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let buffers: Vec<Vec<f64>> = self.transfers.iter().map(|ts| gather(ts, patches)).collect();

        let transfers = &self.transfers;
        field.for_each_patch(|p| scatter(&transfers[p.id()], &buffers[p.id()], p));

        debug!(
            "filled {} ghost cells across {} patches",
            self.ghost_cells(),
            transfers.len()
        );
    }
}

/// Shifts by whole domain periods that can land ghost cells back inside.
fn periodic_shifts(n: i32, periodic: [bool; 3]) -> Vec<[i32; 3]> {
    let along = |d: usize| -> Vec<i32> {
        if periodic[d] { vec![-n, 0, n] } else { vec![0] }
    };
    let mut shifts = Vec::new();
    for &sz in &along(2) {
        for &sy in &along(1) {
            for &sx in &along(0) {
                shifts.push([sx, sy, sz]);
            }
        }
    }
    shifts
}

fn gather(transfers: &[Transfer], patches: &[Patch]) -> Vec<f64> {
    let total: usize = transfers.iter().map(|t| t.region.volume()).sum();
    let mut buf = Vec::with_capacity(total * NCOMPONENTS);
    for t in transfers {
        let src = &patches[t.src];
        for cell in t.region.cells() {
            let from = [cell[0] - t.shift[0], cell[1] - t.shift[1], cell[2] - t.shift[2]];
            buf.extend_from_slice(&src.values_at(from));
        }
    }
    buf
}

fn scatter(transfers: &[Transfer], buf: &[f64], dst: &mut Patch) {
    let mut values = buf.chunks_exact(NCOMPONENTS);
    for t in transfers {
        for cell in t.region.cells() {
            if let Some(v) = values.next() {
                dst.set_values_at(cell, v);
            }
        }
    }
}
