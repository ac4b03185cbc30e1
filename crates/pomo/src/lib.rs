//! pomo - Pomodoro timer with persistent settings and statistics
//!
//! The timer cycles work intervals with short breaks, and takes a long
//! break after every N completed work sessions. It provides:
//! - A single-owner state machine (`Timer`) driven by commands and ticks
//! - Typed events for a presentation layer to render, notify and play sounds
//! - Durable settings and daily/lifetime statistics with day rollover
//! - A tokio event loop (`Runtime`) serializing ticks and commands
//!
//! Commands:
//! - start / pause / toggle: run or hold the countdown
//! - reset: rewind the current interval
//! - skip: finish the current interval now
//! - apply config: replace durations and toggles
//! - reset statistics: zero every counter

pub mod clock;
pub mod error;
pub mod event;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::PomoError;
pub use event::{Command, Event};
pub use runtime::{Runtime, TimerHandle};
pub use session::{Mode, SessionState};
pub use settings::{Preset, SessionConfig};
pub use stats::StatisticsRecord;
pub use store::{FileStore, MemoryStore, Store};
pub use timer::Timer;
