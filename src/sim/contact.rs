//! Contact observer
//!
//! Keeps one boolean per tracked body pair. A begin event sets the flag and
//! an end event clears it; repeats are no-ops, and pairs outside the tracked
//! set are ignored.

use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use super::engine::{ContactEvent, ContactPhase};
use super::scene::SceneBodies;

/// Body pairs whose contact state is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedPair {
    DominoBall,
    BallPlatform,
    BallBeam,
}

/// Current contact flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactState {
    /// Last domino touching the ball
    pub domino_ball: bool,
    /// Ball touching the platform
    pub ball_platform: bool,
    /// Ball touching the beam
    pub ball_beam: bool,
}

impl ContactState {
    fn flag_mut(&mut self, pair: TrackedPair) -> &mut bool {
        match pair {
            TrackedPair::DominoBall => &mut self.domino_ball,
            TrackedPair::BallPlatform => &mut self.ball_platform,
            TrackedPair::BallBeam => &mut self.ball_beam,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactObserver {
    last_domino: RigidBodyHandle,
    ball: RigidBodyHandle,
    platform: RigidBodyHandle,
    beam: RigidBodyHandle,
    state: ContactState,
}

impl ContactObserver {
    /// All flags start false
    pub fn new(
        last_domino: RigidBodyHandle,
        ball: RigidBodyHandle,
        platform: RigidBodyHandle,
        beam: RigidBodyHandle,
    ) -> Self {
        Self {
            last_domino,
            ball,
            platform,
            beam,
            state: ContactState::default(),
        }
    }

    pub fn for_scene(bodies: &SceneBodies) -> Self {
        Self::new(
            bodies.last_domino,
            bodies.ball,
            bodies.platform,
            bodies.beam,
        )
    }

    /// Which tracked pair, if any, `{a, b}` is (order-insensitive)
    pub fn classify(&self, a: RigidBodyHandle, b: RigidBodyHandle) -> Option<TrackedPair> {
        let other = if a == self.ball {
            b
        } else if b == self.ball {
            a
        } else {
            return None;
        };

        if other == self.last_domino {
            Some(TrackedPair::DominoBall)
        } else if other == self.platform {
            Some(TrackedPair::BallPlatform)
        } else if other == self.beam {
            Some(TrackedPair::BallBeam)
        } else {
            None
        }
    }

    /// Apply one contact transition
    pub fn apply(&mut self, event: &ContactEvent) {
        let Some(pair) = self.classify(event.body1, event.body2) else {
            return;
        };
        let touching = event.phase == ContactPhase::Begin;
        let flag = self.state.flag_mut(pair);
        if *flag != touching {
            *flag = touching;
            log::debug!("contact {:?} -> {}", pair, touching);
        }
    }

    pub fn apply_all(&mut self, events: &[ContactEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    pub fn snapshot(&self) -> ContactState {
        self.state
    }
}
