//! Generated scenario catalogue
//!
//! Height ratio x domino count x number of dominoes skipped from the middle
//! of the row. Skipping leaves a gap the chain has to bridge.

use super::layout::SceneLayout;
use super::render_facts;
use crate::consts::*;

/// Spacing used by generated scenarios
pub const SWEEP_SPACING: f32 = 0.5;
/// Gap between the nominal last domino and the ball
pub const SWEEP_BALL_GAP: f32 = 0.1;

/// Axes of the sweep
#[derive(Debug, Clone)]
pub struct SweepSpec {
    /// Height / width ratios
    pub ratios: Vec<u32>,
    pub counts: Vec<usize>,
    pub skips: Vec<usize>,
    pub domino_width: f32,
    pub hole_size: f32,
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self {
            ratios: vec![3, 6, 9, 12],
            counts: vec![5, 10, 20],
            skips: vec![0, 2, 4],
            domino_width: 0.2,
            hole_size: 0.0,
        }
    }
}

/// One generated scenario
#[derive(Debug, Clone)]
pub struct SweepScenario {
    pub name: String,
    pub ratio: u32,
    pub count: usize,
    pub skip: usize,
    pub layout: SceneLayout,
}

impl SweepScenario {
    pub fn facts(&self) -> String {
        render_facts(&self.layout)
    }
}

impl SweepSpec {
    /// All scenarios, ratio-major then count then skip
    pub fn scenarios(&self) -> Vec<SweepScenario> {
        let mut out = Vec::new();
        for &ratio in &self.ratios {
            for &count in &self.counts {
                for &skip in &self.skips {
                    if let Some(layout) = self.layout(ratio, count, skip) {
                        out.push(SweepScenario {
                            name: format!("simple_{}", out.len()),
                            ratio,
                            count,
                            skip,
                            layout,
                        });
                    }
                }
            }
        }
        out
    }

    /// Layout for one point of the sweep, `None` when every domino is skipped
    pub fn layout(&self, ratio: u32, count: usize, skip: usize) -> Option<SceneLayout> {
        let width = self.domino_width;
        let pitch = width + SWEEP_SPACING;
        let mid = count / 2;
        let skipped = mid.saturating_sub(skip / 2)..mid + skip / 2;

        let domino_xs: Vec<f32> = (0..count)
            .filter(|i| !skipped.contains(i))
            .map(|i| DOMINO_START_X + i as f32 * pitch)
            .collect();
        if domino_xs.is_empty() {
            return None;
        }

        // The ball sits past the nominal last slot even if it was skipped
        let last_x = DOMINO_START_X + count.saturating_sub(1) as f32 * pitch;
        Some(SceneLayout {
            domino_width: width,
            domino_height: width * ratio as f32,
            domino_xs,
            ball_x: last_x + width / 2.0 + BALL_RADIUS + SWEEP_BALL_GAP,
            hole_size: self.hole_size,
        })
    }
}
