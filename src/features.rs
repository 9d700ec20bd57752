//! Abstract features over a static scene description
//!
//! Each feature is a scalar derived from the layout alone (no stepping), or
//! `None` where it is undefined for the scene.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::scenario::SceneLayout;
use crate::sphere_mass;

/// Static scene summary the features are computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRep {
    /// Domino x positions, ascending
    pub sorted_domino_positions: Vec<f32>,
    pub domino_width: f32,
    pub domino_height: f32,
    /// Ball x
    pub ball_position: f32,
    pub ball_radius: f32,
    pub ball_density: f32,
}

impl StructureRep {
    pub fn from_layout(layout: &SceneLayout) -> Self {
        let mut sorted_domino_positions = layout.domino_xs.clone();
        sorted_domino_positions.sort_by(f32::total_cmp);
        Self {
            sorted_domino_positions,
            domino_width: layout.domino_width,
            domino_height: layout.domino_height,
            ball_position: layout.ball_x,
            ball_radius: BALL_RADIUS,
            ball_density: BALL_DENSITY,
        }
    }

    fn ball_mass(&self) -> f32 {
        sphere_mass(self.ball_radius, self.ball_density)
    }
}

/// Mean spacing between neighbouring dominoes, if every spacing is within
/// 1% of the domino width of the mean. Needs two or more dominoes.
pub fn spacing_alignment(rep: &StructureRep) -> Option<f32> {
    let xs = &rep.sorted_domino_positions;
    if xs.len() < 2 {
        return None;
    }
    let spacings: Vec<f32> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = spacings.iter().sum::<f32>() / spacings.len() as f32;
    let tolerance = 0.01 * rep.domino_width;
    spacings
        .iter()
        .all(|s| (s - mean).abs() <= tolerance)
        .then_some(mean)
}

/// Ball mass times a unit velocity
pub fn initial_force(rep: &StructureRep) -> Option<f32> {
    const ASSUMED_VELOCITY: f32 = 1.0;
    Some(rep.ball_mass() * ASSUMED_VELOCITY)
}

/// How centred the ball is over the domino span (1 at the centre), if the
/// whole ball lies within the span
pub fn beam_balance(rep: &StructureRep) -> Option<f32> {
    let xs = &rep.sorted_domino_positions;
    let (&first, &last) = (xs.first()?, xs.last()?);
    let within = rep.ball_position - rep.ball_radius >= first
        && rep.ball_position + rep.ball_radius <= last;
    if !within {
        return None;
    }
    let half_span = xs.len() as f32 * rep.domino_width / 2.0;
    let centre = (first + last) / 2.0;
    Some(1.0 - (rep.ball_position - centre).abs() / half_span)
}

/// Ball x relative to the last domino
pub fn ball_offset(rep: &StructureRep) -> Option<f32> {
    rep.sorted_domino_positions
        .last()
        .map(|last| rep.ball_position - last)
}

/// (domino mass / ball mass) x (domino height / ball diameter)
pub fn mass_size_ratio(rep: &StructureRep) -> Option<f32> {
    if rep.ball_radius == 0.0 {
        return None;
    }
    let ball_mass = rep.ball_mass();
    if ball_mass == 0.0 {
        return None;
    }
    let domino_mass = rep.domino_width * rep.domino_height * DOMINO_DENSITY;
    let ratio = (domino_mass / ball_mass) * (rep.domino_height / (2.0 * rep.ball_radius));
    ratio.is_finite().then_some(ratio)
}

/// All five features for one scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub spacing_alignment: Option<f32>,
    pub initial_force: Option<f32>,
    pub beam_balance: Option<f32>,
    pub ball_offset: Option<f32>,
    pub mass_size_ratio: Option<f32>,
}

impl FeatureVector {
    pub fn compute(rep: &StructureRep) -> Self {
        Self {
            spacing_alignment: spacing_alignment(rep),
            initial_force: initial_force(rep),
            beam_balance: beam_balance(rep),
            ball_offset: ball_offset(rep),
            mass_size_ratio: mass_size_ratio(rep),
        }
    }

    pub fn as_array(&self) -> [Option<f32>; 5] {
        [
            self.spacing_alignment,
            self.initial_force,
            self.beam_balance,
            self.ball_offset,
            self.mass_size_ratio,
        ]
    }
}
