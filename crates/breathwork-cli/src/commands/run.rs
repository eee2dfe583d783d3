use std::io::Write;
use std::time::Duration;

use breathwork_core::storage::NotificationsConfig;
use breathwork_core::{
    dispatch, Config, Database, Event, Feedback, FeedbackError, PhaseTimer, Session,
};
use chrono::Local;
use clap::Args;

#[derive(Args)]
pub struct RunArgs {
    /// Exercise id; defaults to `timer.default_exercise`
    id: Option<String>,
    /// Milliseconds between ticks (each tick counts as one second)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Don't print phase changes
    #[arg(long)]
    quiet: bool,
}

/// Renders timer events on the terminal.
struct TerminalFeedback {
    notifications: NotificationsConfig,
    quiet: bool,
}

impl Feedback for TerminalFeedback {
    fn deliver(&mut self, event: &Event) -> Result<(), FeedbackError> {
        let mut err = std::io::stderr().lock();
        let io = |e: std::io::Error| FeedbackError(e.to_string());

        if self.notifications.sound && event.is_cue() {
            err.write_all(b"\x07").map_err(io)?;
        }
        if self.quiet {
            return err.flush().map_err(io);
        }
        let written = match event {
            Event::TimerStarted {
                exercise_id,
                cycles,
                planned_total_secs,
                ..
            } => writeln!(
                err,
                "{exercise_id}: {cycles} cycles, {planned_total_secs}s (Ctrl-C to stop)"
            ),
            Event::PhaseEntered {
                phase,
                cycle,
                duration_secs,
                ..
            } => writeln!(err, "[{cycle}] {phase} {duration_secs}s"),
            Event::TimerCompleted { session, .. } => writeln!(
                err,
                "done: {} cycles, {} min",
                session.cycles_completed, session.duration_minutes
            ),
            Event::TimerStopped { cycle, .. } => writeln!(err, "stopped in cycle {cycle}"),
            Event::StateSnapshot { .. } => Ok(()),
        };
        written.map_err(io)?;
        err.flush().map_err(io)
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let id = args
        .id
        .unwrap_or_else(|| config.timer.default_exercise.clone());
    let profile = config.catalogue().require(&id)?.clone();

    let tick_ms = args.tick_ms.unwrap_or(config.timer.tick_interval_ms);
    if tick_ms == 0 {
        return Err("tick interval must be at least 1 ms".into());
    }

    tracing::debug!(exercise = %id, tick_ms, "starting exercise");
    let mut timer = PhaseTimer::new(profile)?;
    let mut sink = TerminalFeedback {
        notifications: config.notifications.clone(),
        quiet: args.quiet,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let completed = runtime.block_on(drive(
        &mut timer,
        &mut sink,
        Duration::from_millis(tick_ms),
    ))?;

    let Some(session) = completed else {
        // Stopped: nothing is recorded.
        return Ok(());
    };

    let db = Database::open()?;
    let stats = db.append_session(session.clone(), &Local::now())?;
    let out = serde_json::json!({ "session": session, "stats": stats });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Deliver ticks until the timer completes or Ctrl-C stops it.
async fn drive(
    timer: &mut PhaseTimer,
    sink: &mut TerminalFeedback,
    tick: Duration,
) -> Result<Option<Session>, Box<dyn std::error::Error>> {
    dispatch(sink, &timer.start()?);

    let mut interval = tokio::time::interval(tick);
    // The first tick of an interval fires immediately.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(event) = timer.tick() else { continue };
                dispatch(sink, [&event]);
                if let Event::TimerCompleted { session, .. } = event {
                    return Ok(Some(session));
                }
            }
            _ = &mut ctrl_c => {
                let event = timer.stop()?;
                dispatch(sink, [&event]);
                return Ok(None);
            }
        }
    }
}
