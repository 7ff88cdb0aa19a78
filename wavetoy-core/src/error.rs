//! Error types for the wave evolution core.

use thiserror::Error;

/// Result type for wave evolution operations.
pub type Result<T> = std::result::Result<T, WaveError>;

/// Errors that can occur while setting up or evolving the field.
#[derive(Error, Debug)]
pub enum WaveError {
    /// Invalid setup parameters. Raised before any storage is allocated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stencil pass produced NaN or Inf (usually a Courant-limit violation).
    #[error("Non-finite value {value} in patch {patch} at cell {cell:?}")]
    NonFinite {
        patch: usize,
        cell: [i32; 3],
        value: f64,
    },

    /// IO error from an output sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WaveError {
    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
