//! Statistics over the session history.
//!
//! The snapshot is never patched in place: every call recomputes it from
//! the full history, so it cannot drift from the sessions it summarises.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calendar::{bucket_by_day, DaySummary};
use crate::session::Session;

/// Aggregate statistics shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub sessions_today: u32,
    pub total_minutes: u64,
    /// Consecutive days with a session, ending today or yesterday.
    pub current_streak: u32,
    /// Minutes per day that had at least one session, rounded.
    pub average_per_day: u64,
    pub last_session_date: Option<DateTime<Utc>>,
}

impl StatsSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Recompute statistics from `sessions` as of `as_of`.
///
/// Days are calendar days in `as_of`'s time zone. Total over any history,
/// including an empty one.
pub fn recompute<Tz: TimeZone>(sessions: &[Session], as_of: &DateTime<Tz>) -> StatsSnapshot {
    if sessions.is_empty() {
        return StatsSnapshot::empty();
    }

    let buckets = bucket_by_day(sessions, &as_of.timezone());
    let today = as_of.date_naive();

    let total_minutes: u64 = sessions
        .iter()
        .map(|s| u64::from(s.duration_minutes))
        .sum();

    StatsSnapshot {
        sessions_today: buckets.get(&today).map(|d| d.sessions).unwrap_or(0),
        total_minutes,
        current_streak: streak_ending(&buckets, today),
        average_per_day: rounded_div(total_minutes, buckets.len() as u64),
        last_session_date: sessions.iter().map(|s| s.timestamp).max(),
    }
}

/// Append `session` and recompute over the resulting history.
pub fn append_session<Tz: TimeZone>(
    mut history: Vec<Session>,
    session: Session,
    as_of: &DateTime<Tz>,
) -> (Vec<Session>, StatsSnapshot) {
    history.push(session);
    let snapshot = recompute(&history, as_of);
    tracing::debug!(
        sessions = history.len(),
        streak = snapshot.current_streak,
        "stats recomputed"
    );
    (history, snapshot)
}

/// Today may still be empty without breaking yesterday's streak.
fn streak_ending(buckets: &BTreeMap<NaiveDate, DaySummary>, today: NaiveDate) -> u32 {
    let mut day = Some(today);
    if !buckets.contains_key(&today) {
        day = today.pred_opt();
    }

    let mut streak = 0;
    while let Some(d) = day {
        if !buckets.contains_key(&d) {
            break;
        }
        streak += 1;
        day = d.pred_opt();
    }
    streak
}

/// Integer division rounding half up; 0 when `den` is 0.
fn rounded_div(num: u64, den: u64) -> u64 {
    if den == 0 {
        return 0;
    }
    (num + den / 2) / den
}
