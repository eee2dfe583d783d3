//! # Breathwork Core Library
//!
//! This library provides the core logic for the Breathwork guided-breathing
//! app. Front ends (the bundled CLI, or a mobile shell) own the clock and
//! the screen; everything that has rules lives here.
//!
//! ## Architecture
//!
//! - **Phase Timer**: A tick-driven state machine over inhale/hold/exhale
//!   phases and cycles. The caller delivers one `tick()` per second
//! - **Statistics**: Pure recomputation of the home-screen numbers from
//!   the session history
//! - **Storage**: SQLite-based session history and TOML-based configuration
//! - **Feedback**: Trait seam for rendering phase cues as sound or vibration
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`Catalogue`]: Built-in exercise profiles
//! - [`recompute`]: Session history to [`StatsSnapshot`]
//! - [`Database`]: Session and snapshot persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod exercise;
pub mod feedback;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, FeedbackError};
pub use events::Event;
pub use exercise::{Catalogue, ExerciseProfile};
pub use feedback::{dispatch, Feedback, NoFeedback};
pub use session::Session;
pub use stats::{append_session, day_buckets, recompute, DaySummary, StatsSnapshot};
pub use storage::{Config, Database};
pub use timer::{Phase, PhaseTimer, TimerStatus};
