//! Per-patch sweeps: seeding, time-level cycling, the leapfrog stencil and the
//! error diagnostic.
//!
//! Every function here touches exactly one patch and never reads or writes
//! another patch's storage, so callers may run them concurrently across
//! patches.

use crate::analytic::standing;
use crate::error::{Result, WaveError};
use crate::geometry::Domain;
use crate::patch::{Component, Patch};

#[inline]
fn sqr(x: f64) -> f64 {
    x * x
}

/// Seed `phi` at `t0` and `phi_p` at `t0 - dt` over the whole fab box.
///
/// Ghosts get analytic values too, so the first stencil pass needs no sync.
pub fn initialize(patch: &mut Patch, domain: &Domain, t0: f64, dt: f64) {
    let fab = patch.fab_box();
    let [_, dj, dk] = patch.strides();
    let (phi, phi_p) = patch.seed_mut();

    for k in fab.lo[2]..=fab.hi[2] {
        let z = domain.coord(2, k);
        for j in fab.lo[1]..=fab.hi[1] {
            let y = domain.coord(1, j);
            let row = (k - fab.lo[2]) as usize * dk + (j - fab.lo[1]) as usize * dj;
            for i in fab.lo[0]..=fab.hi[0] {
                let x = domain.coord(0, i);
                let idx = row + (i - fab.lo[0]) as usize;
                phi[idx] = standing(t0, x, y, z);
                phi_p[idx] = standing(t0 - dt, x, y, z);
            }
        }
    }
}

/// Shift time levels: `phi_p -> phi_p_p`, then `phi -> phi_p`.
///
/// Covers interior and ghosts. `phi` keeps its old contents until the
/// stencil overwrites the interior.
pub fn cycle_time_levels(patch: &mut Patch) {
    patch.copy_component(Component::PhiP, Component::PhiPP);
    patch.copy_component(Component::Phi, Component::PhiP);
}

/// Leapfrog update of `phi` over the patch interior:
///
/// `phi = -phi_p_p + 2 phi_p + dt² (Dxx + Dyy + Dzz) phi_p`
///
/// Reads one ghost layer of `phi_p`, which must be valid. Returns an error on
/// the first NaN or Inf written.
pub fn leapfrog(patch: &mut Patch, dx: [f64; 3], dt: f64) -> Result<()> {
    let id = patch.id();
    let valid = patch.valid_box();
    let fab = patch.fab_box();
    let [di, dj, dk] = patch.strides();
    let (phi, phi_p, phi_p_p) = patch.levels_mut();

    let (idx2, idy2, idz2) = (1.0 / sqr(dx[0]), 1.0 / sqr(dx[1]), 1.0 / sqr(dx[2]));
    let dt2 = sqr(dt);

    for k in valid.lo[2]..=valid.hi[2] {
        for j in valid.lo[1]..=valid.hi[1] {
            let row = (k - fab.lo[2]) as usize * dk + (j - fab.lo[1]) as usize * dj;
            for i in valid.lo[0]..=valid.hi[0] {
                let idx = row + (i - fab.lo[0]) as usize;
                let p = phi_p[idx];
                let ddx = (phi_p[idx - di] - 2.0 * p + phi_p[idx + di]) * idx2;
                let ddy = (phi_p[idx - dj] - 2.0 * p + phi_p[idx + dj]) * idy2;
                let ddz = (phi_p[idx - dk] - 2.0 * p + phi_p[idx + dk]) * idz2;
                let v = -phi_p_p[idx] + 2.0 * p + dt2 * (ddx + ddy + ddz);
                if !v.is_finite() {
                    return Err(WaveError::NonFinite {
                        patch: id,
                        cell: [i, j, k],
                        value: v,
                    });
                }
                phi[idx] = v;
            }
        }
    }
    Ok(())
}

/// `error = phi - standing(t)` over the whole fab box.
pub fn compute_error(patch: &mut Patch, domain: &Domain, t: f64) {
    let fab = patch.fab_box();
    let [_, dj, dk] = patch.strides();
    let (phi, err) = patch.error_mut();

    for k in fab.lo[2]..=fab.hi[2] {
        let z = domain.coord(2, k);
        for j in fab.lo[1]..=fab.hi[1] {
            let y = domain.coord(1, j);
            let row = (k - fab.lo[2]) as usize * dk + (j - fab.lo[1]) as usize * dj;
            for i in fab.lo[0]..=fab.hi[0] {
                let idx = row + (i - fab.lo[0]) as usize;
                err[idx] = phi[idx] - standing(t, domain.coord(0, i), y, z);
            }
        }
    }
}
