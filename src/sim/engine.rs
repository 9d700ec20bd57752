//! Boundary between the outcome tracker and the physics engine
//!
//! The tracker only needs two things from an engine: advance one fixed step
//! (reporting contacts that began or ended during it) and read back a body's
//! pose and velocity.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

/// Whether two bodies started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A contact transition between two bodies during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub body1: RigidBodyHandle,
    pub body2: RigidBodyHandle,
}

impl ContactEvent {
    pub fn begin(body1: RigidBodyHandle, body2: RigidBodyHandle) -> Self {
        Self {
            phase: ContactPhase::Begin,
            body1,
            body2,
        }
    }

    pub fn end(body1: RigidBodyHandle, body2: RigidBodyHandle) -> Self {
        Self {
            phase: ContactPhase::End,
            body1,
            body2,
        }
    }

    /// True if the event involves exactly the unordered pair `{a, b}`
    pub fn involves(&self, a: RigidBodyHandle, b: RigidBodyHandle) -> bool {
        (self.body1 == a && self.body2 == b) || (self.body1 == b && self.body2 == a)
    }
}

/// Snapshot of a body's pose and velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec2,
    /// Orientation (radians, counter-clockwise positive), wrapped to `(-π, π]`
    /// rather than accumulated across full turns
    pub angle: f32,
    pub linvel: Vec2,
    pub angvel: f32,
}

impl BodyState {
    pub fn at_rest(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            linvel: Vec2::ZERO,
            angvel: 0.0,
        }
    }

    /// True if every component is finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.angle.is_finite()
            && self.linvel.is_finite()
            && self.angvel.is_finite()
    }
}

/// A fixed-timestep physics engine
pub trait Engine {
    /// Advance one step, appending contact transitions to `events`
    fn step(&mut self, events: &mut Vec<ContactEvent>);

    /// Current state of a body, `None` if the handle is unknown
    fn body_state(&self, body: RigidBodyHandle) -> Option<BodyState>;
}
