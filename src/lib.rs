//! Domino Beam - domino chain, ball and balance beam scenarios
//!
//! Core modules:
//! - `scenario`: Scenario parameters, layouts and the fact-list format
//! - `sim`: Scene construction, contact tracking and the outcome state machine
//! - `features`: Abstract features over a static scene description
//! - `settings`: Run modes, timestep and thresholds
//! - `report`: Run reports and sweep summaries
//! - `cli`: Command-line argument parsing

pub mod cli;
pub mod error;
pub mod features;
pub mod report;
pub mod scenario;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use report::{RunReport, SweepSummary};
pub use scenario::{ScenarioConfig, SceneLayout};
pub use settings::{RunMode, RunSettings};

/// Scene geometry and run constants
pub mod consts {
    /// Gravity (m/s², pointing down)
    pub const GRAVITY_Y: f32 = -10.0;

    /// Velocity and position solver iterations per step
    pub const VELOCITY_ITERATIONS: usize = 10;
    pub const POSITION_ITERATIONS: usize = 10;

    /// Elevated platform (the ledge the dominoes stand on)
    pub const PLATFORM_CENTER: (f32, f32) = (12.5, 5.0);
    pub const PLATFORM_HALF_EXTENTS: (f32, f32) = (12.5, 1.0);
    /// Top surface of the platform
    pub const PLATFORM_TOP: f32 = 6.0;
    /// Right edge of the platform, where the hole begins
    pub const PLATFORM_EDGE_X: f32 = 25.0;

    /// Landing ledge on the far side of the hole
    pub const LEDGE_HALF_EXTENTS: (f32, f32) = (1.0, 1.0);

    /// Dominoes
    pub const DOMINO_START_X: f32 = 5.0;
    pub const DOMINO_DENSITY: f32 = 1.0;
    pub const DOMINO_FRICTION: f32 = 0.3;
    /// Initial tilt of the pushed domino (radians)
    pub const PUSH_ANGLE: f32 = -0.3;

    /// Ball
    pub const BALL_RADIUS: f32 = 0.5;
    pub const BALL_DENSITY: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.3;

    /// Balance beam (seesaw)
    pub const BEAM_LENGTH: f32 = 8.0;
    pub const BEAM_THICKNESS: f32 = 0.2;
    /// Fulcrum x when there is no hole; shifted right by the hole size
    pub const BEAM_BASE_X: f32 = 32.0;
    pub const BEAM_Y: f32 = 2.0;
    pub const BEAM_DENSITY: f32 = 1.0;
    pub const BEAM_FRICTION: f32 = 0.5;
    /// Hinge limit (±15°)
    pub const BEAM_ANGLE_LIMIT: f32 = std::f32::consts::PI / 12.0;

    /// Cups at each end of the beam
    pub const CUP_WIDTH: f32 = 2.0;
    pub const CUP_HEIGHT: f32 = 1.0;
    pub const WALL_THICKNESS: f32 = 0.1;

    /// Beam angle beyond which the run ends (strict inequality)
    pub const BEAM_TIP_THRESHOLD: f32 = 0.2;
    /// Domino angle beyond which a domino counts as tipped
    pub const DOMINO_TIP_THRESHOLD: f32 = 0.5;
    /// Ball x velocity above which the ball counts as moving right
    pub const BALL_MOVING_THRESHOLD: f32 = 0.1;
}

/// Ball mass from its radius and density (treated as a sphere)
#[inline]
pub fn sphere_mass(radius: f32, density: f32) -> f32 {
    density * (4.0 / 3.0) * std::f32::consts::PI * radius.powi(3)
}
