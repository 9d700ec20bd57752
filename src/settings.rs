//! Run settings
//!
//! Timestep, horizon, solver iterations and outcome thresholds. Persisted as
//! JSON so sweeps can be repeated with identical settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Run mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunMode {
    /// 60 Hz for 15 seconds (slider/task runs)
    #[default]
    Interactive,
    /// 120 Hz for 30 seconds (scenario files)
    Batch,
    /// 60 Hz for 3 seconds (single domino tip probe)
    Probe,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Interactive => "interactive",
            RunMode::Batch => "batch",
            RunMode::Probe => "probe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "interactive" | "live" => Some(RunMode::Interactive),
            "batch" => Some(RunMode::Batch),
            "probe" => Some(RunMode::Probe),
            _ => None,
        }
    }

    /// Physics steps per simulated second
    pub fn steps_per_second(&self) -> u32 {
        match self {
            RunMode::Interactive => 60,
            RunMode::Batch => 120,
            RunMode::Probe => 60,
        }
    }

    /// Simulated seconds before the run times out
    pub fn duration_secs(&self) -> u32 {
        match self {
            RunMode::Interactive => 15,
            RunMode::Batch => 30,
            RunMode::Probe => 3,
        }
    }
}

/// Outcome thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// |beam angle| beyond this ends the run (radians)
    pub beam_tip: f32,
    /// |domino angle| beyond this marks the domino tipped (radians)
    pub domino_tip: f32,
    /// Ball x velocity above this counts as moving right (m/s)
    pub ball_moving: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            beam_tip: BEAM_TIP_THRESHOLD,
            domino_tip: DOMINO_TIP_THRESHOLD,
            ball_moving: BALL_MOVING_THRESHOLD,
        }
    }
}

/// Settings for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub mode: RunMode,
    pub steps_per_second: u32,
    pub duration_secs: u32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    pub gravity: f32,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Record a per-step trace in the run report
    #[serde(default)]
    pub record_trace: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_preset(RunMode::Interactive)
    }
}

impl RunSettings {
    /// Create settings from a run mode (applies the mode's rate and horizon)
    pub fn from_preset(mode: RunMode) -> Self {
        Self {
            mode,
            steps_per_second: mode.steps_per_second(),
            duration_secs: mode.duration_secs(),
            velocity_iterations: VELOCITY_ITERATIONS,
            position_iterations: POSITION_ITERATIONS,
            gravity: GRAVITY_Y,
            thresholds: Thresholds::default(),
            record_trace: false,
        }
    }

    /// Switch mode, resetting rate and horizon to the mode's values
    pub fn apply_preset(&mut self, mode: RunMode) {
        self.mode = mode;
        self.steps_per_second = mode.steps_per_second();
        self.duration_secs = mode.duration_secs();
    }

    /// Fixed timestep in seconds
    pub fn time_step(&self) -> f32 {
        1.0 / self.steps_per_second as f32
    }

    /// Maximum number of physics steps in a run
    pub fn horizon(&self) -> u32 {
        self.duration_secs.saturating_mul(self.steps_per_second)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps_per_second == 0 {
            return Err(Error::config("steps_per_second must be positive"));
        }
        if self.duration_secs == 0 {
            return Err(Error::config("duration_secs must be positive"));
        }
        if self.velocity_iterations == 0 || self.position_iterations == 0 {
            return Err(Error::config("solver iterations must be positive"));
        }
        let t = &self.thresholds;
        if !(t.beam_tip.is_finite() && t.domino_tip.is_finite() && t.ball_moving.is_finite()) {
            return Err(Error::config("thresholds must be finite"));
        }
        if !self.gravity.is_finite() {
            return Err(Error::config("gravity must be finite"));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded run settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Run settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
