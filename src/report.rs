//! Run reports and sweep summaries
//!
//! Both serialize to JSON so results can be diffed across runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{RunPhase, Telemetry, TraceFrame};

/// Result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Terminal phase
    pub outcome: RunPhase,
    /// Physics steps taken
    pub steps: u32,
    pub sim_seconds: f32,
    /// Beam angle after the last step (radians)
    pub final_beam_angle: f32,
    pub telemetry: Telemetry,
    /// Per-step trace, empty unless requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceFrame>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcome == RunPhase::Success
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One named scenario outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepEntry {
    pub name: String,
    pub outcome: RunPhase,
    pub steps: u32,
}

/// Outcomes of a scenario sweep, in run order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepSummary {
    pub entries: Vec<SweepEntry>,
}

impl SweepSummary {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished run
    pub fn add(&mut self, name: impl Into<String>, report: &RunReport) {
        self.entries.push(SweepEntry {
            name: name.into(),
            outcome: report.outcome,
            steps: report.steps,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.count(RunPhase::Success)
    }

    /// Number of entries that ended in `outcome`
    pub fn count(&self, outcome: RunPhase) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Write the summary as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!(
            "Sweep summary saved ({} entries) to {}",
            self.entries.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
