//! Session modes and runtime state
//!
//! A session cycles Work -> ShortBreak/LongBreak -> Work. The state here is
//! never persisted; it is rebuilt from the settings on every load.

/// Which interval the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Focused work interval
    Work,
    /// Short rest between work intervals
    ShortBreak,
    /// Long rest after every N work intervals
    LongBreak,
}

impl Mode {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortBreak => "Short break",
            Mode::LongBreak => "Long break",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Work
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Observable state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    /// Seconds remaining in the current interval
    pub time_left: u32,
    pub running: bool,
}

impl SessionState {
    /// Initial state: a stopped work interval of `work_seconds`
    pub fn new(work_seconds: u32) -> Self {
        Self {
            mode: Mode::Work,
            time_left: work_seconds,
            running: false,
        }
    }
}
