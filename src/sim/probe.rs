//! Single-domino tip probe
//!
//! Stands one pushed domino on the platform and reports whether it falls
//! within the run horizon.

use glam::Vec2;

use super::engine::Engine;
use super::world::{Fixture, PhysicsWorld};
use crate::consts::*;
use crate::error::{Error, Result};
use crate::scenario::SceneLayout;
use crate::settings::RunSettings;

/// True if a `width x height` domino, started at the push angle, passes the
/// domino tip threshold before the horizon
pub fn domino_tips(width: f32, height: f32, settings: &RunSettings) -> Result<bool> {
    settings.validate()?;
    let layout = SceneLayout {
        domino_width: width,
        domino_height: height,
        domino_xs: vec![DOMINO_START_X],
        ball_x: DOMINO_START_X,
        hole_size: 0.0,
    };
    layout.validate()?;

    let mut world = PhysicsWorld::new(settings);
    world.add_static(
        Vec2::from(PLATFORM_CENTER),
        &[Fixture::centered_box(
            Vec2::from(PLATFORM_HALF_EXTENTS),
            1.0,
            DOMINO_FRICTION,
        )],
    );
    let domino = super::scene::spawn_dominoes(&mut world, &layout)[0];

    let mut events = Vec::new();
    for step in 1..=settings.horizon() {
        world.step(&mut events);
        events.clear();
        let state = world
            .body_state(domino)
            .ok_or_else(|| Error::fault(step, "domino", "is missing from the world"))?;
        if !state.is_finite() {
            return Err(Error::fault(step, "domino", "has a non-finite state"));
        }
        if state.angle.abs() > settings.thresholds.domino_tip {
            log::info!("{width}x{height} domino tipped at step {step}");
            return Ok(true);
        }
    }
    log::info!("{width}x{height} domino still standing after {} steps", settings.horizon());
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RunMode;

    #[test]
    fn test_tall_domino_tips() {
        let settings = RunSettings::from_preset(RunMode::Probe);
        assert!(domino_tips(0.2, 1.0, &settings).unwrap());
    }

    #[test]
    fn test_squat_block_stays_up() {
        // Centre of mass stays over the base at -0.3 rad
        let settings = RunSettings::from_preset(RunMode::Probe);
        assert!(!domino_tips(0.6, 0.4, &settings).unwrap());
    }

    #[test]
    fn test_rejects_degenerate_domino() {
        let settings = RunSettings::from_preset(RunMode::Probe);
        let err = domino_tips(0.0, 1.0, &settings).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
