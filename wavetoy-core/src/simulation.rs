//! Step driver: owns geometry, storage and the clock, and exposes each phase
//! of a time step as its own operation.

use crate::config::WaveToyConfig;
use crate::error::Result;
use crate::field::MultiField;
use crate::geometry::{COURANT_LIMIT_3D, Domain};
use crate::kernels;
use crate::output::{PlotFrame, PlotSink, plotfile_name};
use crate::patch::Component;
use crate::sync::SyncPlan;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Simulation time and iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Clock {
    pub time: f64,
    pub delta_time: f64,
    pub iteration: u64,
}

impl Clock {
    pub fn tick(&mut self) {
        self.time += self.delta_time;
        self.iteration += 1;
    }
}

/// Norms of the error component over interior cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorNorms {
    pub max_abs: f64,
    /// Root mean square.
    pub l2: f64,
}

pub struct WaveToy {
    domain: Domain,
    field: MultiField,
    sync: SyncPlan,
    clock: Clock,
}

impl WaveToy {
    /// Validate parameters, decompose the domain and allocate all storage.
    ///
    /// Time starts at 0 with `dt = dtfac / ncells`. Field values are zero
    /// until [`initialize`](Self::initialize) runs.
    pub fn new(cfg: &WaveToyConfig) -> Result<WaveToy> {
        cfg.validate()?;

        let domain = Domain::from_config(cfg);
        let field = MultiField::new(&domain, cfg.max_grid_size);
        let sync = SyncPlan::new(&domain, &field);
        let clock = Clock {
            time: 0.0,
            delta_time: cfg.delta_time(),
            iteration: 0,
        };

        let courant = domain.courant_number(clock.delta_time);
        info!(
            "wavetoy setup: ncells={} nghostzones={} patches={} dx={:?} dt={} courant={:.4}",
            domain.ncells,
            domain.nghostzones,
            field.num_patches(),
            domain.dx(),
            clock.delta_time,
            courant
        );
        if courant > COURANT_LIMIT_3D {
            warn!(
                "courant number {:.4} exceeds the leapfrog limit {:.4}; expect blow-up",
                courant, COURANT_LIMIT_3D
            );
        }

        Ok(WaveToy {
            domain,
            field,
            sync,
            clock,
        })
    }

    // ---- Accessors ----

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn field(&self) -> &MultiField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut MultiField {
        &mut self.field
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn time(&self) -> f64 {
        self.clock.time
    }

    pub fn delta_time(&self) -> f64 {
        self.clock.delta_time
    }

    pub fn iteration(&self) -> u64 {
        self.clock.iteration
    }

    pub fn sample(&self, c: Component, cell: [i32; 3]) -> Option<f64> {
        self.field.sample(c, cell)
    }

    pub fn slice_xy(&self, c: Component, k: usize) -> Vec<f64> {
        let k = k.min(self.domain.ncells - 1) as i32;
        self.field.slice_xy(c, self.domain.ncells, k)
    }

    // ---- Scheduled operations ----

    /// Seed `phi` and `phi_p` from the standing wave at the current time,
    /// ghosts included.
    pub fn initialize(&mut self) {
        let (t0, dt) = (self.clock.time, self.clock.delta_time);
        let domain = &self.domain;
        self.field
            .for_each_patch(|p| kernels::initialize(p, domain, t0, dt));
        debug!("initialized at t={}", t0);
    }

    /// Rotate time levels, then advance the clock. No stencil update.
    pub fn cycle(&mut self) {
        self.field.for_each_patch(kernels::cycle_time_levels);
        self.clock.tick();
    }

    /// Rotate time levels and compute the new `phi` over every interior.
    ///
    /// Does not touch the clock and leaves ghosts of `phi` stale; follow with
    /// [`sync`](Self::sync).
    pub fn evolve(&mut self) -> Result<()> {
        let dx = self.domain.dx();
        let dt = self.clock.delta_time;
        self.field.try_for_each_patch(|p| {
            kernels::cycle_time_levels(p);
            kernels::leapfrog(p, dx, dt)
        })
    }

    /// Refresh ghost cells of all components from neighbours and periodic images.
    pub fn sync(&mut self) {
        self.sync.fill_boundary(&mut self.field);
    }

    /// Recompute the error component against the standing wave at the current time.
    pub fn compute_error(&mut self) {
        let t = self.clock.time;
        let domain = &self.domain;
        self.field
            .for_each_patch(|p| kernels::compute_error(p, domain, t));
    }

    /// One full iteration: evolve, sync, advance the clock.
    pub fn step(&mut self) -> Result<()> {
        self.evolve()?;
        self.sync();
        self.clock.tick();
        debug!("iteration {} t={}", self.clock.iteration, self.clock.time);
        Ok(())
    }

    /// Norms of the error component. Call [`compute_error`](Self::compute_error) first.
    pub fn error_norms(&self) -> ErrorNorms {
        let mut max_abs = 0.0f64;
        let mut sum_sq = 0.0;
        let mut count = 0usize;
        for p in self.field.patches() {
            for e in p.interior_values(Component::Error) {
                max_abs = max_abs.max(e.abs());
                sum_sq += e * e;
                count += 1;
            }
        }
        ErrorNorms {
            max_abs,
            l2: (sum_sq / count.max(1) as f64).sqrt(),
        }
    }

    /// Refresh the error component and hand the full state to `sink`.
    pub fn output<S: PlotSink>(&mut self, prefix: &str, sink: &mut S) -> Result<()> {
        self.compute_error();
        let frame = PlotFrame {
            name: plotfile_name(prefix, self.clock.iteration),
            iteration: self.clock.iteration,
            time: self.clock.time,
            domain: &self.domain,
            field: &self.field,
        };
        sink.write_plotfile(&frame)?;
        info!("wrote {} (t={})", frame.name, frame.time);
        Ok(())
    }
}
