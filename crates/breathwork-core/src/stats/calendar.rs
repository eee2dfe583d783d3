//! Calendar-day bucketing of sessions.
//!
//! A session belongs to the calendar day of its completion instant as seen
//! in the zone the caller evaluates in. Sessions are stored in UTC, so
//! changing zones re-buckets the whole history consistently.

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::Session;

/// Sessions and minutes on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sessions: u32,
    pub minutes: u64,
}

/// Calendar day of `session` in `tz`.
pub fn day_of<Tz: TimeZone>(session: &Session, tz: &Tz) -> NaiveDate {
    session.timestamp.with_timezone(tz).date_naive()
}

/// Group sessions into per-day totals, keyed and ordered by date.
pub fn bucket_by_day<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> BTreeMap<NaiveDate, DaySummary> {
    let mut buckets: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for session in sessions {
        let date = day_of(session, tz);
        let entry = buckets.entry(date).or_insert(DaySummary {
            date,
            sessions: 0,
            minutes: 0,
        });
        entry.sessions += 1;
        entry.minutes += u64::from(session.duration_minutes);
    }
    buckets
}

/// Per-day totals, newest day first.
pub fn day_buckets<Tz: TimeZone>(sessions: &[Session], tz: &Tz) -> Vec<DaySummary> {
    bucket_by_day(sessions, tz).into_values().rev().collect()
}
