//! Scalar wave equation on a block-decomposed, periodic Cartesian grid.
//!
//! `φ_tt = ∇²φ` is advanced with the three-level leapfrog scheme and a
//! seven-point Laplacian. The field is split into patches, each with a ghost
//! halo and four component slots (`phi`, `phi_p`, `phi_p_p`, `error`).
//!
//! Per iteration:
//!
//! ```text
//! evolve  : phi_p -> phi_p_p, phi -> phi_p, stencil writes phi (interior)
//! sync    : ghost cells of every component from neighbours / periodic images
//! tick    : t += dt
//! ```

pub mod analytic;
pub mod config;
pub mod error;
pub mod field;
pub mod geometry;
pub mod index_box;
pub mod kernels;
pub mod output;
pub mod patch;
pub mod simulation;
pub mod sync;

pub use config::WaveToyConfig;
pub use error::{Result, WaveError};
pub use field::MultiField;
pub use geometry::Domain;
pub use index_box::IndexBox;
pub use output::{COMPONENT_NAMES, FrameLog, PlotFrame, PlotSink, plotfile_name};
pub use patch::{Component, NCOMPONENTS, Patch};
pub use simulation::{Clock, ErrorNorms, WaveToy};
pub use sync::SyncPlan;
