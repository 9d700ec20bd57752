//! Fixed timestep outcome tracking
//!
//! Steps an [`Engine`] one tick at a time and turns the beam angle into a
//! terminal [`RunPhase`]. Per tick, in order: step the engine, apply contact
//! events, classify the beam, update telemetry, then check the horizon.

use rapier2d::prelude::RigidBodyHandle;

use super::contact::ContactObserver;
use super::engine::{BodyState, ContactEvent, Engine};
use super::scene::SceneBodies;
use super::state::{BeamTip, RunPhase, Telemetry, TraceFrame};
use crate::error::{Error, Result};
use crate::report::RunReport;
use crate::settings::{RunSettings, Thresholds};

/// Which side of the deadband `angle` falls on
///
/// Both boundaries belong to the deadband: exactly `±threshold` is neutral.
pub fn classify_beam(angle: f32, threshold: f32) -> BeamTip {
    if angle > threshold {
        BeamTip::Positive
    } else if angle < -threshold {
        BeamTip::Negative
    } else {
        BeamTip::Neutral
    }
}

pub struct OutcomeTracker {
    first_domino: RigidBodyHandle,
    last_domino: RigidBodyHandle,
    ball: RigidBodyHandle,
    beam: RigidBodyHandle,
    observer: ContactObserver,
    thresholds: Thresholds,
    horizon: u32,
    time_step: f32,
    phase: RunPhase,
    steps: u32,
    beam_angle: f32,
    telemetry: Telemetry,
    trace: Option<Vec<TraceFrame>>,
    events: Vec<ContactEvent>,
}

impl OutcomeTracker {
    pub fn new(bodies: &SceneBodies, settings: &RunSettings) -> Self {
        Self {
            first_domino: bodies.first_domino,
            last_domino: bodies.last_domino,
            ball: bodies.ball,
            beam: bodies.beam,
            observer: ContactObserver::for_scene(bodies),
            thresholds: settings.thresholds,
            horizon: settings.horizon(),
            time_step: settings.time_step(),
            phase: RunPhase::Running,
            steps: 0,
            beam_angle: 0.0,
            telemetry: Telemetry::default(),
            trace: settings.record_trace.then(Vec::new),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Advance one tick. A terminal tracker returns its phase without stepping.
    pub fn advance(&mut self, engine: &mut impl Engine) -> Result<RunPhase> {
        if self.phase.is_terminal() {
            return Ok(self.phase);
        }

        self.events.clear();
        engine.step(&mut self.events);
        self.steps += 1;
        self.observer.apply_all(&self.events);

        let beam = self.read(engine, self.beam, "beam")?;
        let first = self.read(engine, self.first_domino, "first domino")?;
        let last = self.read(engine, self.last_domino, "last domino")?;
        let ball = self.read(engine, self.ball, "ball")?;

        self.beam_angle = beam.angle;
        let tip = classify_beam(beam.angle, self.thresholds.beam_tip);
        let mut next = tip.phase();

        let t = &mut self.telemetry;
        t.first_domino_tipped |= first.angle.abs() > self.thresholds.domino_tip;
        t.last_domino_tipped |= last.angle.abs() > self.thresholds.domino_tip;
        t.ball_moving_right = ball.linvel.x > self.thresholds.ball_moving;
        t.contacts = self.observer.snapshot();

        if next == RunPhase::Running && self.steps >= self.horizon {
            next = RunPhase::TimedOut;
        }

        if let Some(trace) = &mut self.trace {
            trace.push(TraceFrame {
                step: self.steps,
                beam_angle: beam.angle,
                tip,
                telemetry: self.telemetry,
            });
        }

        if next != self.phase {
            log::debug!(
                "step {}: {} -> {} (beam {:.4})",
                self.steps,
                self.phase.as_str(),
                next.as_str(),
                beam.angle
            );
            self.phase = next;
        }
        Ok(self.phase)
    }

    /// Step until a terminal phase and build the report
    pub fn run(mut self, engine: &mut impl Engine) -> Result<RunReport> {
        while !self.phase.is_terminal() {
            if let Err(err) = self.advance(engine) {
                log::warn!("Run aborted: {err}");
                return Err(err);
            }
        }
        Ok(self.into_report())
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            outcome: self.phase,
            steps: self.steps,
            sim_seconds: self.steps as f32 * self.time_step,
            final_beam_angle: self.beam_angle,
            telemetry: self.telemetry,
            trace: self.trace.unwrap_or_default(),
        }
    }

    fn read(
        &self,
        engine: &impl Engine,
        body: RigidBodyHandle,
        name: &'static str,
    ) -> Result<BodyState> {
        let state = engine
            .body_state(body)
            .ok_or_else(|| Error::fault(self.steps, name, "is missing from the world"))?;
        if !state.is_finite() {
            return Err(Error::fault(
                self.steps,
                name,
                format!("has a non-finite state {state:?}"),
            ));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RunMode;
    use glam::Vec2;
    use proptest::prelude::*;

    fn handle(i: u32) -> RigidBodyHandle {
        RigidBodyHandle::from_raw_parts(i, 0)
    }

    fn bodies() -> SceneBodies {
        SceneBodies {
            dominoes: vec![handle(1), handle(2)],
            first_domino: handle(1),
            last_domino: handle(2),
            ball: handle(3),
            beam: handle(4),
            platform: handle(5),
            ledge: handle(6),
            fulcrum: handle(7),
        }
    }

    /// Engine that replays per-step scripts. Each script holds the value seen
    /// after step `n` at index `n - 1`; past the end the last value repeats.
    #[derive(Default)]
    struct ScriptedEngine {
        stepped: usize,
        beam: Vec<f32>,
        first_domino: Vec<f32>,
        last_domino: Vec<f32>,
        ball_vx: Vec<f32>,
        events: Vec<Vec<ContactEvent>>,
        drop_ball_at: Option<usize>,
    }

    impl ScriptedEngine {
        fn with_beam(beam: Vec<f32>) -> Self {
            Self {
                beam,
                ..Default::default()
            }
        }

        fn value(script: &[f32], step: usize) -> f32 {
            script
                .get(step.saturating_sub(1))
                .or(script.last())
                .copied()
                .unwrap_or(0.0)
        }
    }

    impl Engine for ScriptedEngine {
        fn step(&mut self, events: &mut Vec<ContactEvent>) {
            if let Some(step_events) = self.events.get(self.stepped) {
                events.extend_from_slice(step_events);
            }
            self.stepped += 1;
        }

        fn body_state(&self, body: RigidBodyHandle) -> Option<BodyState> {
            let n = self.stepped;
            let mut state = BodyState::at_rest(Vec2::ZERO, 0.0);
            match body {
                b if b == handle(1) => state.angle = Self::value(&self.first_domino, n),
                b if b == handle(2) => state.angle = Self::value(&self.last_domino, n),
                b if b == handle(3) => {
                    if self.drop_ball_at.is_some_and(|at| n >= at) {
                        return None;
                    }
                    state.linvel.x = Self::value(&self.ball_vx, n);
                }
                b if b == handle(4) => state.angle = Self::value(&self.beam, n),
                _ => return None,
            }
            Some(state)
        }
    }

    fn settings() -> RunSettings {
        RunSettings::from_preset(RunMode::Interactive)
    }

    #[test]
    fn test_classify_beam_boundaries() {
        assert_eq!(classify_beam(0.2, 0.2), BeamTip::Neutral);
        assert_eq!(classify_beam(-0.2, 0.2), BeamTip::Neutral);
        assert_eq!(classify_beam(0.0, 0.2), BeamTip::Neutral);
        assert_eq!(classify_beam(0.2001, 0.2), BeamTip::Positive);
        assert_eq!(classify_beam(-0.2001, 0.2), BeamTip::Negative);
    }

    #[test]
    fn test_positive_tip_is_success() {
        let mut engine = ScriptedEngine::with_beam(vec![0.0, 0.1, 0.2, 0.25, -0.3]);
        let report = OutcomeTracker::new(&bodies(), &settings())
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.outcome, RunPhase::Success);
        assert_eq!(report.steps, 4);
        assert_eq!(engine.stepped, 4);
        assert!((report.final_beam_angle - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_negative_tip_is_failure() {
        let mut engine = ScriptedEngine::with_beam(vec![0.0, -0.19, -0.21]);
        let report = OutcomeTracker::new(&bodies(), &settings())
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.outcome, RunPhase::FailureNegativeTip);
        assert_eq!(report.steps, 3);
    }

    #[test]
    fn test_boundary_angle_times_out() {
        let mut engine = ScriptedEngine::with_beam(vec![0.2, -0.2]);
        let settings = settings();
        let report = OutcomeTracker::new(&bodies(), &settings)
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.outcome, RunPhase::TimedOut);
        assert_eq!(report.steps, settings.horizon());
        assert!((report.sim_seconds - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_tip_on_last_step_beats_timeout() {
        let mut settings = settings();
        settings.duration_secs = 1;
        let mut beam = vec![0.0; 59];
        beam.push(0.3);
        let mut engine = ScriptedEngine::with_beam(beam);
        let report = OutcomeTracker::new(&bodies(), &settings)
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.outcome, RunPhase::Success);
        assert_eq!(report.steps, 60);
    }

    #[test]
    fn test_terminal_tracker_does_not_step() {
        let mut engine = ScriptedEngine::with_beam(vec![0.5]);
        let mut tracker = OutcomeTracker::new(&bodies(), &settings());
        assert_eq!(tracker.advance(&mut engine).unwrap(), RunPhase::Success);
        assert_eq!(tracker.advance(&mut engine).unwrap(), RunPhase::Success);
        assert_eq!(engine.stepped, 1);
        assert_eq!(tracker.steps(), 1);
    }

    #[test]
    fn test_non_finite_angle_faults() {
        let mut engine = ScriptedEngine::with_beam(vec![0.0, f32::NAN, 0.5]);
        let err = OutcomeTracker::new(&bodies(), &settings())
            .run(&mut engine)
            .unwrap_err();
        assert!(err.is_fault());
        assert!(matches!(
            err,
            Error::SimulationFault { step: 2, body: "beam", .. }
        ));
    }

    #[test]
    fn test_missing_body_faults() {
        let mut engine = ScriptedEngine {
            drop_ball_at: Some(3),
            ..Default::default()
        };
        let mut tracker = OutcomeTracker::new(&bodies(), &settings());
        assert!(tracker.advance(&mut engine).is_ok());
        assert!(tracker.advance(&mut engine).is_ok());
        let err = tracker.advance(&mut engine).unwrap_err();
        assert!(matches!(err, Error::SimulationFault { body: "ball", .. }));
        assert_ne!(tracker.phase(), RunPhase::Success);
    }

    #[test]
    fn test_domino_tip_latches() {
        let mut engine = ScriptedEngine {
            first_domino: vec![-0.3, -0.6, 0.0],
            last_domino: vec![0.0, 0.0, 0.51],
            ..Default::default()
        };
        let mut tracker = OutcomeTracker::new(&bodies(), &settings());
        tracker.advance(&mut engine).unwrap();
        assert!(!tracker.telemetry().first_domino_tipped);
        tracker.advance(&mut engine).unwrap();
        assert!(tracker.telemetry().first_domino_tipped);
        tracker.advance(&mut engine).unwrap();
        // Still latched after the domino reads upright again
        assert!(tracker.telemetry().first_domino_tipped);
        assert!(tracker.telemetry().last_domino_tipped);
    }

    #[test]
    fn test_ball_moving_recomputed() {
        let mut engine = ScriptedEngine {
            ball_vx: vec![0.5, 0.1, 0.2],
            ..Default::default()
        };
        let mut tracker = OutcomeTracker::new(&bodies(), &settings());
        tracker.advance(&mut engine).unwrap();
        assert!(tracker.telemetry().ball_moving_right);
        tracker.advance(&mut engine).unwrap();
        assert!(!tracker.telemetry().ball_moving_right);
        tracker.advance(&mut engine).unwrap();
        assert!(tracker.telemetry().ball_moving_right);
    }

    #[test]
    fn test_contacts_flow_into_telemetry() {
        let mut engine = ScriptedEngine {
            events: vec![
                vec![ContactEvent::begin(handle(2), handle(3))],
                vec![ContactEvent::begin(handle(3), handle(4))],
                vec![ContactEvent::end(handle(3), handle(2))],
            ],
            ..Default::default()
        };
        let mut tracker = OutcomeTracker::new(&bodies(), &settings());
        tracker.advance(&mut engine).unwrap();
        assert!(tracker.telemetry().contacts.domino_ball);
        tracker.advance(&mut engine).unwrap();
        assert!(tracker.telemetry().contacts.ball_beam);
        tracker.advance(&mut engine).unwrap();
        let contacts = tracker.telemetry().contacts;
        assert!(!contacts.domino_ball);
        assert!(contacts.ball_beam);
        assert!(!contacts.ball_platform);
    }

    #[test]
    fn test_trace_recorded_when_enabled() {
        let mut traced = settings();
        traced.record_trace = true;
        let mut engine = ScriptedEngine::with_beam(vec![0.0, 0.1, 0.3]);
        let report = OutcomeTracker::new(&bodies(), &traced)
            .run(&mut engine)
            .unwrap();
        assert_eq!(report.trace.len(), 3);
        assert_eq!(report.trace[0].step, 1);
        assert_eq!(report.trace[2].tip, BeamTip::Positive);

        let mut engine = ScriptedEngine::with_beam(vec![0.3]);
        let report = OutcomeTracker::new(&bodies(), &settings())
            .run(&mut engine)
            .unwrap();
        assert!(report.trace.is_empty());
    }

    proptest! {
        #[test]
        fn test_halts_at_first_terminal(angles in prop::collection::vec(-0.4f32..0.4, 1..200)) {
            let mut engine = ScriptedEngine::with_beam(angles.clone());
            let report = OutcomeTracker::new(&bodies(), &settings()).run(&mut engine).unwrap();

            match angles.iter().position(|a| a.abs() > 0.2) {
                Some(i) => {
                    prop_assert_eq!(report.steps as usize, i + 1);
                    let expected = if angles[i] > 0.0 {
                        RunPhase::Success
                    } else {
                        RunPhase::FailureNegativeTip
                    };
                    prop_assert_eq!(report.outcome, expected);
                }
                None => {
                    // Last value repeats until the horizon
                    prop_assert_eq!(report.outcome, RunPhase::TimedOut);
                    prop_assert_eq!(report.steps, settings().horizon());
                }
            }
            prop_assert_eq!(engine.stepped, report.steps as usize);
        }
    }
}
