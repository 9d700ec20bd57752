//! Error types
//!
//! Configuration problems surface before any body is created; simulation
//! faults abort a run and never report success.

use thiserror::Error;

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or degenerate topology (no dominoes, non-positive sizes, ...)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-finite pose or velocity, or a tracked body that vanished
    #[error("simulation fault at step {step}: {body} {detail}")]
    SimulationFault {
        step: u32,
        body: &'static str,
        detail: String,
    },

    /// Malformed fact-list line
    #[error("fact list line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn fault(step: u32, body: &'static str, detail: impl Into<String>) -> Self {
        Self::SimulationFault {
            step,
            body,
            detail: detail.into(),
        }
    }

    /// True for faults raised while stepping (as opposed to bad input)
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::SimulationFault { .. })
    }
}
