//! Concrete scene layout: where every domino and the ball start

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Static description of a scene, independent of how it was specified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub domino_width: f32,
    pub domino_height: f32,
    /// Domino centre x positions, strictly increasing
    pub domino_xs: Vec<f32>,
    /// Ball centre x
    pub ball_x: f32,
    /// Width of the hole between the platform and the landing ledge
    pub hole_size: f32,
}

impl SceneLayout {
    /// Check the layout can be materialized
    pub fn validate(&self) -> Result<()> {
        if self.domino_xs.is_empty() {
            return Err(Error::config("at least one domino is required"));
        }
        positive("domino_width", self.domino_width)?;
        positive("domino_height", self.domino_height)?;
        if !self.ball_x.is_finite() {
            return Err(Error::config("ball_x must be finite"));
        }
        if !self.hole_size.is_finite() || self.hole_size < 0.0 {
            return Err(Error::config(format!(
                "hole_size must be non-negative, got {}",
                self.hole_size
            )));
        }
        if self.domino_xs.iter().any(|x| !x.is_finite()) {
            return Err(Error::config("domino positions must be finite"));
        }
        if let Some(pair) = self.domino_xs.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::config(format!(
                "domino positions must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }

    pub fn domino_count(&self) -> usize {
        self.domino_xs.len()
    }

    /// Centre y shared by every domino (standing on the platform)
    pub fn domino_y(&self) -> f32 {
        PLATFORM_TOP + self.domino_height / 2.0
    }

    pub fn ball_y(&self) -> f32 {
        PLATFORM_TOP + BALL_RADIUS
    }

    /// Fulcrum / beam centre
    pub fn beam_position(&self) -> (f32, f32) {
        (BEAM_BASE_X + self.hole_size, BEAM_Y)
    }

    /// Landing ledge centre
    pub fn ledge_position(&self) -> (f32, f32) {
        (
            PLATFORM_EDGE_X + self.hole_size + LEDGE_HALF_EXTENTS.0,
            PLATFORM_CENTER.1,
        )
    }

    /// Initial angle of domino `index`; only the leftmost starts tilted
    pub fn domino_angle(&self, index: usize) -> f32 {
        if index == 0 { PUSH_ANGLE } else { 0.0 }
    }
}

pub(crate) fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!("{name} must be positive, got {value}")))
    }
}
