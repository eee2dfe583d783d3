mod engine;
mod phase;

pub use engine::PhaseTimer;
pub use phase::{Phase, TimerStatus};
