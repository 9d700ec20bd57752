//! Parameter-vector scenario configuration

use serde::{Deserialize, Serialize};

use super::layout::{SceneLayout, positive};
use crate::consts::*;
use crate::error::{Error, Result};

/// Number of scalars in a parameter vector
pub const PARAM_COUNT: usize = 6;

/// The six scalars that fully determine a uniform scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub domino_spacing: f32,
    pub domino_width: f32,
    pub domino_height: f32,
    pub domino_count: u32,
    /// Gap between the last domino and the ball
    pub ball_gap: f32,
    pub beam_hole_size: f32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            domino_spacing: 0.5,
            domino_width: 0.2,
            domino_height: 1.0,
            domino_count: 20,
            ball_gap: 0.1,
            beam_hole_size: 0.1,
        }
    }
}

impl ScenarioConfig {
    /// Build from `[spacing, width, height, count, gap, hole_size]`
    ///
    /// Missing trailing values keep their defaults. The count is truncated to
    /// an integer; whether it is positive is checked by [`Self::validate`].
    pub fn from_params(params: &[f32]) -> Result<Self> {
        if params.len() > PARAM_COUNT {
            return Err(Error::config(format!(
                "expected at most {PARAM_COUNT} parameters, got {}",
                params.len()
            )));
        }
        let mut config = Self::default();
        for (i, &value) in params.iter().enumerate() {
            match i {
                0 => config.domino_spacing = value,
                1 => config.domino_width = value,
                2 => config.domino_height = value,
                3 => config.domino_count = coerce_count(value)?,
                4 => config.ball_gap = value,
                _ => config.beam_hole_size = value,
            }
        }
        Ok(config)
    }

    /// Named task presets
    pub fn task(name: &str) -> Option<Self> {
        let params: [f32; PARAM_COUNT] = match name {
            "task_1" => [0.5, 0.2, 1.0, 4.0, 0.1, 0.0],
            "task_2" => [0.5, 0.2, 1.0, 22.0, 2.0, 0.0],
            "task_3" => [0.5, 0.2, 1.0, 6.0, 0.6, 0.0],
            _ => return None,
        };
        Self::from_params(&params).ok()
    }

    pub fn validate(&self) -> Result<()> {
        if self.domino_count < 1 {
            return Err(Error::config("domino_count must be at least 1"));
        }
        positive("domino_width", self.domino_width)?;
        positive("domino_height", self.domino_height)?;
        for (name, value) in [
            ("domino_spacing", self.domino_spacing),
            ("ball_gap", self.ball_gap),
            ("beam_hole_size", self.beam_hole_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Centre x of domino `index`
    pub fn domino_x(&self, index: u32) -> f32 {
        DOMINO_START_X + index as f32 * (self.domino_width + self.domino_spacing)
    }

    /// Uniform layout: `domino_count` evenly spaced dominoes, ball past the last
    pub fn layout(&self) -> Result<SceneLayout> {
        self.validate()?;
        let domino_xs: Vec<f32> = (0..self.domino_count).map(|i| self.domino_x(i)).collect();
        let last_x = self.domino_x(self.domino_count - 1);
        let layout = SceneLayout {
            domino_width: self.domino_width,
            domino_height: self.domino_height,
            domino_xs,
            ball_x: last_x + self.domino_width / 2.0 + BALL_RADIUS + self.ball_gap,
            hole_size: self.beam_hole_size,
        };
        layout.validate()?;
        Ok(layout)
    }
}

fn coerce_count(value: f32) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f32 {
        return Err(Error::config(format!("invalid domino count {value}")));
    }
    Ok(value.trunc() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_params() {
        let config = ScenarioConfig::from_params(&[0.4, 0.3]).unwrap();
        assert_eq!(config.domino_spacing, 0.4);
        assert_eq!(config.domino_width, 0.3);
        assert_eq!(config.domino_height, 1.0);
        assert_eq!(config.domino_count, 20);
    }

    #[test]
    fn test_count_truncated() {
        let config = ScenarioConfig::from_params(&[0.5, 0.2, 1.0, 4.9]).unwrap();
        assert_eq!(config.domino_count, 4);
    }

    #[test]
    fn test_too_many_params() {
        assert!(ScenarioConfig::from_params(&[0.0; 7]).is_err());
    }

    #[test]
    fn test_zero_dominoes_is_config_error() {
        let config = ScenarioConfig::from_params(&[0.5, 0.2, 1.0, 0.0, 0.1, 0.0]).unwrap();
        assert!(matches!(config.layout(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_task_presets() {
        let task_2 = ScenarioConfig::task("task_2").unwrap();
        assert_eq!(task_2.domino_count, 22);
        assert_eq!(task_2.ball_gap, 2.0);
        assert!(ScenarioConfig::task("task_9").is_none());
    }

    #[test]
    fn test_uniform_layout() {
        let config = ScenarioConfig::from_params(&[0.5, 0.2, 1.0, 5.0, 0.1, 0.0]).unwrap();
        let layout = config.layout().unwrap();
        assert_eq!(layout.domino_count(), 5);
        assert_eq!(layout.domino_xs[0], DOMINO_START_X);
        let last = layout.domino_xs[4];
        assert!((last - 7.8).abs() < 1e-5);
        assert!((layout.ball_x - (last + 0.1 + 0.5 + 0.1)).abs() < 1e-5);
    }
}
