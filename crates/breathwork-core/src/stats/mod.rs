//! Statistics module for Breathwork
//!
//! Derives the home-screen numbers (sessions today, total minutes, streak,
//! daily average) from the session history, plus per-day summaries for
//! history listings.

mod aggregator;
mod calendar;

pub use aggregator::{append_session, recompute, StatsSnapshot};
pub use calendar::{day_buckets, day_of, DaySummary};
