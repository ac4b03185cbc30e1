//! Commands accepted by the timer and events it emits

use std::time::Duration;

use crate::session::Mode;
use crate::settings::SessionConfig;

/// Presentation-to-core commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Pause when running, start otherwise
    Toggle,
    Reset,
    Skip,
    ApplyConfig(SessionConfig),
    /// Caller is responsible for asking the user first
    ResetStatistics,
    /// Stop the runtime and hand the timer back
    Shutdown,
}

/// Core-to-presentation events, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Remaining time changed
    Tick { time_left: u32 },
    ModeChanged { mode: Mode },
    Started { mode: Mode },
    Paused,
    /// Countdown rewound to the full duration of the current mode
    Reset,
    /// A work interval finished; `next_mode` is the break that follows
    SessionCompleted { next_mode: Mode },
    /// A break finished; work follows
    BreakCompleted,
    StatsUpdated {
        daily: u32,
        lifetime: u32,
        total_work_seconds: u64,
    },
    ConfigApplied { config: SessionConfig },
    StatsReset,
    /// The runtime will issue `Start` after `delay`
    AutoStartScheduled { delay: Duration },
    /// A command was refused; state is unchanged
    Rejected { reason: String },
}

impl Event {
    /// Notification text for events the user should be told about
    pub fn notification(&self) -> Option<String> {
        match self {
            Event::Started { mode: Mode::Work } => Some("Work session started!".to_string()),
            Event::Started { .. } => Some("Break started!".to_string()),
            Event::Paused => Some("Paused".to_string()),
            Event::Reset => Some("Timer reset".to_string()),
            Event::SessionCompleted {
                next_mode: Mode::LongBreak,
            } => Some("Work session complete! Time for a long break.".to_string()),
            Event::SessionCompleted { .. } => {
                Some("Work session complete! Time for a short break.".to_string())
            }
            Event::BreakCompleted => Some("Break is over! Back to work.".to_string()),
            Event::ConfigApplied { .. } => Some("Settings saved!".to_string()),
            Event::StatsReset => Some("Statistics reset!".to_string()),
            Event::Rejected { reason } => Some(reason.clone()),
            Event::Tick { .. }
            | Event::ModeChanged { .. }
            | Event::StatsUpdated { .. }
            | Event::AutoStartScheduled { .. } => None,
        }
    }
}
