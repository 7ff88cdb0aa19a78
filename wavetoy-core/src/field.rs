//! The distributed field: every patch of the decomposition, allocated once.

use crate::error::Result;
use crate::geometry::Domain;
use crate::index_box::IndexBox;
use crate::patch::{Component, Patch};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct MultiField {
    patches: Vec<Patch>,
}

impl MultiField {
    /// Chop the domain into patches of at most `max_grid_size` cells per axis.
    pub fn new(domain: &Domain, max_grid_size: usize) -> Self {
        let patches = domain
            .cell_box()
            .chop(max_grid_size)
            .into_iter()
            .enumerate()
            .map(|(id, valid)| Patch::new(id, valid, domain.nghostzones))
            .collect();
        Self { patches }
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Patch whose interior contains `cell`.
    pub fn owner(&self, cell: [i32; 3]) -> Option<&Patch> {
        self.patches.iter().find(|p| p.valid_box().contains(cell))
    }

    /// Interior value of one global cell.
    pub fn sample(&self, c: Component, cell: [i32; 3]) -> Option<f64> {
        self.owner(cell).map(|p| p.get(c, cell))
    }

    /// One xy plane of interior values at `z = k`, x fastest.
    pub fn slice_xy(&self, c: Component, ncells: usize, k: i32) -> Vec<f64> {
        let mut out = vec![0.0; ncells * ncells];
        let plane = IndexBox::new([0, 0, k], [ncells as i32 - 1, ncells as i32 - 1, k]);
        for p in &self.patches {
            if let Some(region) = p.valid_box().intersect(&plane) {
                for cell in region.cells() {
                    out[cell[1] as usize * ncells + cell[0] as usize] = p.get(c, cell);
                }
            }
        }
        out
    }

    /// Run `f` on every patch, one task per patch when built with `parallel`.
    pub fn for_each_patch<F>(&mut self, f: F)
    where
        F: Fn(&mut Patch) + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        self.patches.par_iter_mut().for_each(f);
        #[cfg(not(feature = "parallel"))]
        self.patches.iter_mut().for_each(f);
    }

    /// Fallible [`for_each_patch`](Self::for_each_patch); stops at the first error.
    pub fn try_for_each_patch<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(&mut Patch) -> Result<()> + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        return self.patches.par_iter_mut().try_for_each(f);
        #[cfg(not(feature = "parallel"))]
        return self.patches.iter_mut().try_for_each(f);
    }
}
