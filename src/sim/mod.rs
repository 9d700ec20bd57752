//! Deterministic simulation module
//!
//! Scene construction, contact tracking and the outcome state machine:
//! - Fixed timestep only
//! - Contacts drained after each step, never observed mid-step
//! - One run owns its world, contact flags and tracker

pub mod contact;
pub mod engine;
pub mod probe;
pub mod scene;
pub mod state;
pub mod tick;
pub mod world;

pub use contact::{ContactObserver, ContactState, TrackedPair};
pub use engine::{BodyState, ContactEvent, ContactPhase, Engine};
pub use probe::domino_tips;
pub use scene::{SceneBodies, build_scene};
pub use state::{BeamTip, RunPhase, Telemetry, TraceFrame};
pub use tick::{OutcomeTracker, classify_beam};
pub use world::{Fixture, PhysicsWorld};

use crate::error::Result;
use crate::report::RunReport;
use crate::scenario::SceneLayout;
use crate::settings::RunSettings;

/// Build `layout` in a fresh world and step it to a terminal phase
pub fn run_scenario(layout: &SceneLayout, settings: &RunSettings) -> Result<RunReport> {
    settings.validate()?;
    let mut world = PhysicsWorld::new(settings);
    let bodies = build_scene(&mut world, layout)?;

    log::info!(
        "Running {} mode: {} Hz, horizon {} steps",
        settings.mode.as_str(),
        settings.steps_per_second,
        settings.horizon()
    );
    let report = OutcomeTracker::new(&bodies, settings).run(&mut world)?;
    log::info!(
        "Run finished: {} after {} steps ({:.2}s)",
        report.outcome.as_str(),
        report.steps,
        report.sim_seconds
    );
    Ok(report)
}
