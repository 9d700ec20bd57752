//! Scenario descriptions
//!
//! A scenario starts life either as a parameter vector or as a fact list;
//! both become a [`SceneLayout`], the only thing the scene builder reads.

pub mod config;
pub mod facts;
pub mod layout;
pub mod sweep;

pub use config::ScenarioConfig;
pub use facts::{parse_facts, render_facts};
pub use layout::SceneLayout;
pub use sweep::{SweepScenario, SweepSpec};
