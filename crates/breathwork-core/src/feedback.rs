//! Feedback collaborator seam.
//!
//! The timer only returns events; rendering them as sound, vibration or
//! text belongs to a [`Feedback`] sink supplied by the caller. A failing
//! sink is logged and otherwise ignored so it can never disturb timing.

use crate::error::FeedbackError;
use crate::events::Event;

/// Receives timer events and renders device feedback.
pub trait Feedback {
    fn deliver(&mut self, event: &Event) -> Result<(), FeedbackError>;
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn deliver(&mut self, _event: &Event) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Deliver every event to `sink`, swallowing failures.
///
/// Returns the number of events that failed to deliver.
pub fn dispatch<'a, F, I>(sink: &mut F, events: I) -> usize
where
    F: Feedback + ?Sized,
    I: IntoIterator<Item = &'a Event>,
{
    let mut failed = 0;
    for event in events {
        if let Err(e) = sink.deliver(event) {
            tracing::warn!(error = %e, "feedback delivery failed");
            failed += 1;
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseProfile;
    use crate::timer::PhaseTimer;

    /// Records events and fails on every cue.
    #[derive(Default)]
    struct FlakySink {
        received: Vec<Event>,
    }

    impl Feedback for FlakySink {
        fn deliver(&mut self, event: &Event) -> Result<(), FeedbackError> {
            self.received.push(event.clone());
            if event.is_cue() {
                return Err(FeedbackError("haptics unavailable".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn failing_sink_does_not_affect_timer() {
        let profile = ExerciseProfile::new("t", 1, Some(1), 1, 2);
        let mut timer = PhaseTimer::new(profile).unwrap();
        let mut sink = FlakySink::default();

        let mut failures = dispatch(&mut sink, &timer.start().unwrap());
        let mut completed = 0;
        while timer.is_running() {
            if let Some(event) = timer.tick() {
                if matches!(event, Event::TimerCompleted { .. }) {
                    completed += 1;
                }
                failures += dispatch(&mut sink, [&event]);
            }
        }

        assert_eq!(completed, 1);
        assert_eq!(timer.total_elapsed_secs(), 6);
        // Started, then inhale/hold/exhale twice, then completion.
        assert_eq!(sink.received.len(), 8);
        // Inhale and exhale entries twice each, plus completion.
        assert_eq!(failures, 5);
    }

    #[test]
    fn no_feedback_accepts_everything() {
        let profile = ExerciseProfile::new("t", 1, None, 1, 1);
        let mut timer = PhaseTimer::new(profile).unwrap();
        let events = timer.start().unwrap();
        assert_eq!(dispatch(&mut NoFeedback, &events), 0);
    }
}
