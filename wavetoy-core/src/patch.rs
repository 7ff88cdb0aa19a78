//! Per-patch multi-component storage.
//!
//! Each patch owns one contiguous buffer covering its fabricated box (interior
//! plus ghost halo) for all components. Layout is component-major, then z, y,
//! x with x fastest:
//! `index = c * len + (k - lo.z) * dk + (j - lo.y) * dj + (i - lo.x)`

use crate::index_box::IndexBox;

/// Number of stored components.
pub const NCOMPONENTS: usize = 4;

/// Fixed component slots. Slot indices never change during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Current value φ
    Phi,
    /// One step back
    PhiP,
    /// Two steps back
    PhiPP,
    /// φ minus the analytic solution (diagnostic)
    Error,
}

impl Component {
    pub const ALL: [Component; NCOMPONENTS] = [
        Component::Phi,
        Component::PhiP,
        Component::PhiPP,
        Component::Error,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Component::Phi => 0,
            Component::PhiP => 1,
            Component::PhiPP => 2,
            Component::Error => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Phi => "phi",
            Component::PhiP => "phi_p",
            Component::PhiPP => "phi_p_p",
            Component::Error => "error",
        }
    }
}

pub struct Patch {
    id: usize,
    /// Cells this patch updates.
    valid: IndexBox,
    /// `valid` grown by the ghost width.
    fab: IndexBox,
    /// Cells per component.
    len: usize,
    dj: usize,
    dk: usize,
    data: Vec<f64>,
}

impl Patch {
    pub fn new(id: usize, valid: IndexBox, nghost: usize) -> Self {
        let fab = valid.grow(nghost);
        let len = fab.volume();
        let dj = fab.len(0);
        let dk = dj * fab.len(1);
        Self {
            id,
            valid,
            fab,
            len,
            dj,
            dk,
            data: vec![0.0; NCOMPONENTS * len],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn valid_box(&self) -> IndexBox {
        self.valid
    }

    pub fn fab_box(&self) -> IndexBox {
        self.fab
    }

    /// Offsets between neighbouring cells along x, y and z.
    pub fn strides(&self) -> [usize; 3] {
        [1, self.dj, self.dk]
    }

    /// Offset of `cell` within one component. `cell` must lie in the fab box.
    #[inline]
    pub fn offset(&self, cell: [i32; 3]) -> usize {
        debug_assert!(self.fab.contains(cell), "cell {:?} outside {:?}", cell, self.fab);
        (cell[0] - self.fab.lo[0]) as usize
            + (cell[1] - self.fab.lo[1]) as usize * self.dj
            + (cell[2] - self.fab.lo[2]) as usize * self.dk
    }

    pub fn component(&self, c: Component) -> &[f64] {
        let start = c.index() * self.len;
        &self.data[start..start + self.len]
    }

    pub fn component_mut(&mut self, c: Component) -> &mut [f64] {
        let start = c.index() * self.len;
        &mut self.data[start..start + self.len]
    }

    #[inline]
    pub fn get(&self, c: Component, cell: [i32; 3]) -> f64 {
        self.data[c.index() * self.len + self.offset(cell)]
    }

    #[inline]
    pub fn set(&mut self, c: Component, cell: [i32; 3], value: f64) {
        let idx = c.index() * self.len + self.offset(cell);
        self.data[idx] = value;
    }

    /// Copy one component over the whole fab box (interior and ghosts).
    pub fn copy_component(&mut self, src: Component, dst: Component) {
        let s = src.index() * self.len;
        self.data.copy_within(s..s + self.len, dst.index() * self.len);
    }

    /// `(phi, phi_p, phi_p_p)` with only `phi` writable.
    pub fn levels_mut(&mut self) -> (&mut [f64], &[f64], &[f64]) {
        let (phi, rest) = self.data.split_at_mut(self.len);
        let (phi_p, rest) = rest.split_at(self.len);
        (phi, phi_p, &rest[..self.len])
    }

    /// `(phi, error)` with only `error` writable.
    pub fn error_mut(&mut self) -> (&[f64], &mut [f64]) {
        let (head, tail) = self.data.split_at_mut(Component::Error.index() * self.len);
        (&head[..self.len], &mut tail[..self.len])
    }

    /// `(phi, phi_p)`, both writable.
    pub fn seed_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        let (phi, rest) = self.data.split_at_mut(self.len);
        (phi, &mut rest[..self.len])
    }

    /// Interior values of one component, x fastest.
    pub fn interior_values(&self, c: Component) -> impl Iterator<Item = f64> + '_ {
        self.valid.cells().map(move |cell| self.get(c, cell))
    }

    /// Every component value at `cell`, in slot order.
    pub fn values_at(&self, cell: [i32; 3]) -> [f64; NCOMPONENTS] {
        let o = self.offset(cell);
        std::array::from_fn(|c| self.data[c * self.len + o])
    }

    pub fn set_values_at(&mut self, cell: [i32; 3], values: &[f64]) {
        let o = self.offset(cell);
        for (c, &v) in values.iter().enumerate().take(NCOMPONENTS) {
            self.data[c * self.len + o] = v;
        }
    }
}
