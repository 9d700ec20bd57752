//! Run state types
//!
//! Phase of a run, per-step telemetry and the optional trace.

use serde::{Deserialize, Serialize};

use super::contact::ContactState;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunPhase {
    /// Stepping; beam within the deadband
    #[default]
    Running,
    /// Beam tipped positive
    Success,
    /// Beam tipped negative
    FailureNegativeTip,
    /// Horizon reached while running
    TimedOut,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunPhase::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Running => "running",
            RunPhase::Success => "success",
            RunPhase::FailureNegativeTip => "failure_negative_tip",
            RunPhase::TimedOut => "timed_out",
        }
    }
}

/// Which side of the deadband the beam is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamTip {
    Positive,
    Negative,
    Neutral,
}

impl BeamTip {
    /// Phase this tip puts a running tracker in
    pub fn phase(self) -> RunPhase {
        match self {
            BeamTip::Positive => RunPhase::Success,
            BeamTip::Negative => RunPhase::FailureNegativeTip,
            BeamTip::Neutral => RunPhase::Running,
        }
    }
}

/// Observations that never change the outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Latched once the first domino passes the tip threshold
    pub first_domino_tipped: bool,
    /// Latched once the last domino passes the tip threshold
    pub last_domino_tipped: bool,
    /// Ball x velocity above threshold on the latest step
    pub ball_moving_right: bool,
    pub contacts: ContactState,
}

/// One recorded step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub step: u32,
    pub beam_angle: f32,
    pub tip: BeamTip,
    pub telemetry: Telemetry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_is_non_terminal() {
        assert!(!RunPhase::Running.is_terminal());
        assert!(RunPhase::Success.is_terminal());
        assert!(RunPhase::FailureNegativeTip.is_terminal());
        assert!(RunPhase::TimedOut.is_terminal());
        assert_eq!(RunPhase::default(), RunPhase::Running);
    }

    #[test]
    fn test_tip_to_phase() {
        assert_eq!(BeamTip::Positive.phase(), RunPhase::Success);
        assert_eq!(BeamTip::Negative.phase(), RunPhase::FailureNegativeTip);
        assert_eq!(BeamTip::Neutral.phase(), RunPhase::Running);
    }

    #[test]
    fn test_phase_serializes_by_name() {
        let json = serde_json::to_string(&RunPhase::FailureNegativeTip).unwrap();
        assert_eq!(json, "\"FailureNegativeTip\"");
        assert_eq!(RunPhase::TimedOut.as_str(), "timed_out");
    }
}
