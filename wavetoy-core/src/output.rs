//! Contract with the plot-file writer.

use crate::field::MultiField;
use crate::geometry::Domain;
use crate::patch::{Component, Patch};

/// Component names in slot order.
pub const COMPONENT_NAMES: [&str; 4] = ["phi", "phi_p", "phi_p_p", "error"];

/// `prefix` followed by the iteration zero-padded to 6 digits.
pub fn plotfile_name(prefix: &str, iteration: u64) -> String {
    format!("{prefix}{iteration:06}")
}

/// Everything a writer may read. All components are current when a frame is
/// handed out, the error component included.
pub struct PlotFrame<'a> {
    pub name: String,
    pub iteration: u64,
    pub time: f64,
    pub domain: &'a Domain,
    pub field: &'a MultiField,
}

impl PlotFrame<'_> {
    pub fn component_names(&self) -> [&'static str; 4] {
        COMPONENT_NAMES
    }

    pub fn patches(&self) -> &[Patch] {
        self.field.patches()
    }
}

/// Serializes a frame. Encoding is up to the implementor.
pub trait PlotSink {
    fn write_plotfile(&mut self, frame: &PlotFrame<'_>) -> std::io::Result<()>;
}

/// Keeps a summary of every frame in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct FrameLog {
    pub frames: Vec<FrameSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    pub name: String,
    pub iteration: u64,
    pub time: f64,
    pub max_abs_error: f64,
}

impl PlotSink for FrameLog {
    fn write_plotfile(&mut self, frame: &PlotFrame<'_>) -> std::io::Result<()> {
        let max_abs_error = frame
            .patches()
            .iter()
            .flat_map(|p| p.interior_values(Component::Error))
            .map(f64::abs)
            .fold(0.0, f64::max);
        self.frames.push(FrameSummary {
            name: frame.name.clone(),
            iteration: frame.iteration,
            time: frame.time,
            max_abs_error,
        });
        Ok(())
    }
}
