use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed exercise run. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub exercise_id: String,
    /// When the run completed.
    pub timestamp: DateTime<Utc>,
    pub duration_minutes: u32,
    pub cycles_completed: u32,
}

impl Session {
    /// Synthesize the record for a finished run.
    pub fn from_run(
        exercise_id: impl Into<String>,
        total_elapsed_secs: u64,
        cycles_completed: u32,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            exercise_id: exercise_id.into(),
            timestamp: completed_at,
            duration_minutes: round_minutes(total_elapsed_secs),
            cycles_completed,
        }
    }
}

/// Seconds to whole minutes, half a minute rounds up.
pub fn round_minutes(secs: u64) -> u32 {
    u32::try_from(secs.saturating_add(30) / 60).unwrap_or(u32::MAX)
}
