use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    /// Reserved. No built-in profile has a rest phase and the timer never enters it.
    Rest,
}

impl Phase {
    /// Seconds this phase lasts under `profile`.
    pub fn duration_secs(self, profile: &ExerciseProfile) -> u32 {
        match self {
            Phase::Inhale => profile.inhale_secs,
            Phase::Hold => profile.effective_hold_secs().unwrap_or(0),
            Phase::Exhale => profile.exhale_secs,
            Phase::Rest => 0,
        }
    }

    /// Inhale and exhale entries are signalled to the user.
    pub fn is_cue(self) -> bool {
        matches!(self, Phase::Inhale | Phase::Exhale)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
            Phase::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    /// Terminal for the current run; `start` begins a fresh one.
    Completed,
}
