//! Phase timer implementation.
//!
//! The timer is a tick-driven state machine. It does not read the clock or
//! spawn threads: the caller delivers one `tick()` per elapsed second while
//! the timer is running, and stops delivering after `stop()`.
//!
//! ## Phase Transitions
//!
//! ```text
//! Inhale -> [Hold] -> Exhale -> Inhale (next cycle) ... -> Completed
//! ```
//!
//! Hold is skipped when the profile has no hold (or a zero hold).
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(profile)?;
//! timer.start()?;
//! // Once per second:
//! if let Some(event) = timer.tick() { /* feedback, completion */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, TimerStatus};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::exercise::ExerciseProfile;
use crate::session::Session;

/// Drives one exercise through its phases and cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTimer {
    profile: ExerciseProfile,
    status: TimerStatus,
    phase: Phase,
    /// 1-indexed.
    current_cycle: u32,
    remaining_secs: u32,
    total_elapsed_secs: u64,
}

impl PhaseTimer {
    /// Create an idle timer for `profile`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidProfile`] if the profile has a zero inhale,
    /// exhale or cycle count.
    pub fn new(profile: ExerciseProfile) -> Result<Self> {
        profile.validate()?;
        let remaining_secs = Phase::Inhale.duration_secs(&profile);
        Ok(Self {
            profile,
            status: TimerStatus::Idle,
            phase: Phase::Inhale,
            current_cycle: 1,
            remaining_secs,
            total_elapsed_secs: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_elapsed_secs(&self) -> u64 {
        self.total_elapsed_secs
    }

    pub fn profile(&self) -> &ExerciseProfile {
        &self.profile
    }

    pub fn phase_secs(&self) -> u32 {
        self.phase.duration_secs(&self.profile)
    }

    /// Sum of every phase over every cycle.
    pub fn planned_total_secs(&self) -> u64 {
        self.profile.total_secs()
    }

    /// 0.0 .. 1.0 progress within current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.phase_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// 0.0 .. 100.0 progress across the whole exercise.
    pub fn session_progress_pct(&self) -> f64 {
        if self.status == TimerStatus::Completed {
            return 100.0;
        }
        let planned = self.planned_total_secs();
        if planned == 0 {
            return 0.0;
        }
        (self.total_elapsed_secs as f64 / planned as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            exercise_id: self.profile.id.clone(),
            phase: self.phase,
            cycle: self.current_cycle,
            cycles: self.profile.cycles,
            remaining_secs: self.remaining_secs,
            phase_secs: self.phase_secs(),
            total_elapsed_secs: self.total_elapsed_secs,
            session_progress_pct: self.session_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<Vec<Event>> {
        self.start_at(Utc::now())
    }

    /// Begin a run from the first inhale. Allowed from idle or after a
    /// completed run.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidState`] if a run is already in progress.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        if self.is_running() {
            return Err(CoreError::InvalidState(format!(
                "exercise '{}' is already running",
                self.profile.id
            )));
        }
        self.rewind();
        self.status = TimerStatus::Running;
        tracing::debug!(exercise = %self.profile.id, "timer started");

        Ok(vec![
            Event::TimerStarted {
                exercise_id: self.profile.id.clone(),
                cycles: self.profile.cycles,
                planned_total_secs: self.planned_total_secs(),
                at: now,
            },
            self.phase_entered(now),
        ])
    }

    pub fn stop(&mut self) -> Result<Event> {
        self.stop_at(Utc::now())
    }

    /// Abandon the run and rewind to the first inhale. No session is produced.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidState`] if the timer is not running.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Result<Event> {
        if !self.is_running() {
            return Err(CoreError::InvalidState(format!(
                "exercise '{}' is not running",
                self.profile.id
            )));
        }
        let event = Event::TimerStopped {
            cycle: self.current_cycle,
            elapsed_secs: self.total_elapsed_secs,
            at: now,
        };
        self.rewind();
        self.status = TimerStatus::Idle;
        tracing::debug!(exercise = %self.profile.id, "timer stopped");
        Ok(event)
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// Advance by one second. Returns the event for a phase change or for
    /// completion; ticks delivered while not running are ignored.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.total_elapsed_secs += 1;
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.advance(now))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, now: DateTime<Utc>) -> Event {
        match self.phase {
            Phase::Inhale => {
                let next = if self.profile.effective_hold_secs().is_some() {
                    Phase::Hold
                } else {
                    Phase::Exhale
                };
                self.enter(next, now)
            }
            Phase::Hold | Phase::Rest => self.enter(Phase::Exhale, now),
            Phase::Exhale if self.current_cycle < self.profile.cycles => {
                self.current_cycle += 1;
                self.enter(Phase::Inhale, now)
            }
            Phase::Exhale => self.complete(now),
        }
    }

    fn enter(&mut self, phase: Phase, now: DateTime<Utc>) -> Event {
        self.phase = phase;
        self.remaining_secs = phase.duration_secs(&self.profile);
        tracing::debug!(%phase, cycle = self.current_cycle, "phase entered");
        self.phase_entered(now)
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Event {
        self.status = TimerStatus::Completed;
        self.remaining_secs = 0;
        let session = Session::from_run(
            self.profile.id.clone(),
            self.total_elapsed_secs,
            self.current_cycle,
            now,
        );
        tracing::debug!(
            exercise = %self.profile.id,
            elapsed_secs = self.total_elapsed_secs,
            "timer completed"
        );
        Event::TimerCompleted { session, at: now }
    }

    fn phase_entered(&self, now: DateTime<Utc>) -> Event {
        Event::PhaseEntered {
            phase: self.phase,
            cycle: self.current_cycle,
            duration_secs: self.remaining_secs,
            cue: self.phase.is_cue(),
            at: now,
        }
    }

    fn rewind(&mut self) {
        self.phase = Phase::Inhale;
        self.current_cycle = 1;
        self.remaining_secs = Phase::Inhale.duration_secs(&self.profile);
        self.total_elapsed_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(hold: Option<u32>, cycles: u32) -> ExerciseProfile {
        ExerciseProfile::new("test", 2, hold, 3, cycles)
    }

    fn phases_of_one_cycle(p: ExerciseProfile) -> Vec<Phase> {
        let mut timer = PhaseTimer::new(p).unwrap();
        timer.start().unwrap();
        let mut seen = vec![timer.phase()];
        while timer.current_cycle() == 1 && timer.is_running() {
            if let Some(Event::PhaseEntered { phase, cycle: 1, .. }) = timer.tick() {
                seen.push(phase);
            }
        }
        seen
    }

    #[test]
    fn new_timer_is_idle_at_first_inhale() {
        let timer = PhaseTimer::new(profile(Some(1), 2)).unwrap();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.phase(), Phase::Inhale);
        assert_eq!(timer.current_cycle(), 1);
        assert_eq!(timer.remaining_secs(), 2);
        assert_eq!(timer.total_elapsed_secs(), 0);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let err = PhaseTimer::new(ExerciseProfile::new("bad", 4, None, 4, 0)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidProfile { .. }));
    }

    #[test]
    fn cycle_without_hold_is_inhale_exhale() {
        assert_eq!(
            phases_of_one_cycle(profile(None, 2)),
            [Phase::Inhale, Phase::Exhale]
        );
    }

    #[test]
    fn cycle_with_zero_hold_skips_hold() {
        assert_eq!(
            phases_of_one_cycle(profile(Some(0), 2)),
            [Phase::Inhale, Phase::Exhale]
        );
    }

    #[test]
    fn cycle_with_hold_is_inhale_hold_exhale() {
        assert_eq!(
            phases_of_one_cycle(profile(Some(1), 2)),
            [Phase::Inhale, Phase::Hold, Phase::Exhale]
        );
    }

    #[test]
    fn start_emits_started_and_inhale_cue() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        let events = timer.start().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::TimerStarted { planned_total_secs: 5, .. }));
        assert!(matches!(
            events[1],
            Event::PhaseEntered { phase: Phase::Inhale, cycle: 1, duration_secs: 2, cue: true, .. }
        ));
    }

    #[test]
    fn start_while_running_is_invalid_state() {
        let mut timer = PhaseTimer::new(profile(None, 3)).unwrap();
        timer.start().unwrap();
        timer.tick();
        let err = timer.start().unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        // The running session is untouched.
        assert_eq!(timer.total_elapsed_secs(), 1);
        assert!(timer.is_running());
    }

    #[test]
    fn hold_entry_is_not_a_cue() {
        let mut timer = PhaseTimer::new(profile(Some(4), 1)).unwrap();
        timer.start().unwrap();
        timer.tick();
        let event = timer.tick().unwrap();
        assert!(matches!(event, Event::PhaseEntered { phase: Phase::Hold, cue: false, .. }));
        assert!(!event.is_cue());
    }

    #[test]
    fn remaining_counts_down_each_tick() {
        let mut timer = PhaseTimer::new(ExerciseProfile::new("t", 5, None, 5, 1)).unwrap();
        timer.start().unwrap();
        for expected in (1..5).rev() {
            assert!(timer.tick().is_none());
            assert_eq!(timer.remaining_secs(), expected);
        }
        assert!(timer.tick().is_some());
        assert_eq!(timer.phase(), Phase::Exhale);
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[test]
    fn runs_to_single_completion() {
        let mut timer = PhaseTimer::new(profile(Some(1), 3)).unwrap();
        timer.start().unwrap();
        let ticks = (2 + 1 + 3) * 3;
        let mut completions = Vec::new();
        for _ in 0..ticks {
            if let Some(Event::TimerCompleted { session, .. }) = timer.tick() {
                completions.push(session);
            }
        }
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].cycles_completed, 3);
        assert_eq!(timer.status(), TimerStatus::Completed);
        assert_eq!(timer.total_elapsed_secs(), ticks);
        assert_eq!(timer.session_progress_pct(), 100.0);
    }

    #[test]
    fn ticks_after_completion_are_ignored() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        timer.start().unwrap();
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.status(), TimerStatus::Completed);
        assert!(timer.tick().is_none());
        assert_eq!(timer.total_elapsed_secs(), 5);
    }

    #[test]
    fn ticks_while_idle_are_ignored() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        assert!(timer.tick().is_none());
        assert_eq!(timer.total_elapsed_secs(), 0);
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn stop_mid_session_resets_without_completion() {
        let mut timer = PhaseTimer::new(profile(Some(1), 4)).unwrap();
        timer.start().unwrap();
        for _ in 0..10 {
            assert!(!matches!(timer.tick(), Some(Event::TimerCompleted { .. })));
        }
        assert_eq!(timer.current_cycle(), 2);

        let event = timer.stop().unwrap();
        assert!(matches!(event, Event::TimerStopped { cycle: 2, elapsed_secs: 10, .. }));
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.phase(), Phase::Inhale);
        assert_eq!(timer.current_cycle(), 1);
        assert_eq!(timer.total_elapsed_secs(), 0);
        assert!(timer.tick().is_none());
    }

    #[test]
    fn stop_when_idle_is_invalid_state() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        assert!(matches!(timer.stop(), Err(CoreError::InvalidState(_))));
    }

    #[test]
    fn restart_after_completion_begins_fresh_run() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        timer.start().unwrap();
        for _ in 0..5 {
            timer.tick();
        }
        timer.start().unwrap();
        assert!(timer.is_running());
        assert_eq!(timer.total_elapsed_secs(), 0);
        assert_eq!(timer.current_cycle(), 1);
        assert_eq!(timer.phase(), Phase::Inhale);
    }

    #[test]
    fn completion_session_uses_tick_timestamp() {
        let mut timer = PhaseTimer::new(profile(None, 1)).unwrap();
        let t0 = Utc::now();
        timer.start_at(t0).unwrap();
        let mut last = None;
        for i in 1..=5 {
            last = timer.tick_at(t0 + chrono::Duration::seconds(i));
        }
        match last {
            Some(Event::TimerCompleted { session, at }) => {
                assert_eq!(at, t0 + chrono::Duration::seconds(5));
                assert_eq!(session.timestamp, at);
                assert_eq!(session.duration_minutes, 0);
            }
            other => panic!("Expected TimerCompleted, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let timer = PhaseTimer::new(profile(None, 2)).unwrap();
        match timer.snapshot() {
            Event::StateSnapshot {
                status,
                phase,
                cycle,
                cycles,
                remaining_secs,
                ..
            } => {
                assert_eq!(status, TimerStatus::Idle);
                assert_eq!(phase, Phase::Inhale);
                assert_eq!(cycle, 1);
                assert_eq!(cycles, 2);
                assert_eq!(remaining_secs, 2);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
