use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::timer::{Phase, TimerStatus};

/// Every state change of the phase timer produces an Event.
/// The caller forwards them to its feedback collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        exercise_id: String,
        cycles: u32,
        planned_total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A new phase began. `cue` is set for inhale and exhale, the two
    /// entries that get sound or vibration.
    PhaseEntered {
        phase: Phase,
        cycle: u32,
        duration_secs: u32,
        cue: bool,
        at: DateTime<Utc>,
    },
    /// Raised once, on the final exhale running out.
    TimerCompleted {
        session: Session,
        at: DateTime<Utc>,
    },
    TimerStopped {
        cycle: u32,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        exercise_id: String,
        phase: Phase,
        cycle: u32,
        cycles: u32,
        remaining_secs: u32,
        phase_secs: u32,
        total_elapsed_secs: u64,
        session_progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for events the feedback collaborator should render as a cue.
    pub fn is_cue(&self) -> bool {
        matches!(
            self,
            Event::PhaseEntered { cue: true, .. } | Event::TimerCompleted { .. }
        )
    }
}
