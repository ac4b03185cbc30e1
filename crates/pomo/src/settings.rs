//! Timer settings and their durable record
//!
//! The record is decoded field by field: a missing or invalid field falls
//! back to its default without discarding the rest of the record.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::PomoError;
use crate::session::Mode;

pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECONDS: u32 = 15 * 60;
pub const DEFAULT_SESSIONS_BEFORE_LONG: u32 = 4;

/// User-configurable durations and toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub work_seconds: u32,
    pub break_seconds: u32,
    pub long_break_seconds: u32,
    /// Every Nth completed work session is followed by a long break
    pub sessions_before_long: u32,
    /// Start the next interval automatically after a completion
    pub auto_start: bool,
    pub sound_enabled: bool,
    pub dark_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_seconds: DEFAULT_WORK_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
            long_break_seconds: DEFAULT_LONG_BREAK_SECONDS,
            sessions_before_long: DEFAULT_SESSIONS_BEFORE_LONG,
            auto_start: false,
            sound_enabled: true,
            dark_mode: false,
        }
    }
}

/// On-disk shape of `pomodoro_settings`
#[derive(Debug, Serialize)]
struct StoredSettings {
    work: u32,
    #[serde(rename = "break")]
    short: u32,
    long: u32,
    #[serde(rename = "sessionsBeforeLong")]
    sessions_before_long: u32,
    #[serde(rename = "autoStart")]
    auto_start: bool,
    sound: bool,
    dark: bool,
}

impl SessionConfig {
    /// Configured length of an interval in `mode`
    pub fn duration(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_seconds,
            Mode::ShortBreak => self.break_seconds,
            Mode::LongBreak => self.long_break_seconds,
        }
    }

    /// Check every duration is positive and the long-break period is at least 1
    pub fn validate(&self) -> Result<(), PomoError> {
        let positive = [
            ("work", self.work_seconds),
            ("break", self.break_seconds),
            ("long", self.long_break_seconds),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(PomoError::InvalidConfig {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        if self.sessions_before_long < 1 {
            return Err(PomoError::InvalidConfig {
                field: "sessionsBeforeLong",
                reason: "must be at least 1",
            });
        }

        Ok(())
    }

    /// Encode as the `pomodoro_settings` JSON record
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&StoredSettings {
            work: self.work_seconds,
            short: self.break_seconds,
            long: self.long_break_seconds,
            sessions_before_long: self.sessions_before_long,
            auto_start: self.auto_start,
            sound: self.sound_enabled,
            dark: self.dark_mode,
        })
    }

    /// Decode a `pomodoro_settings` record, substituting defaults per field
    pub fn from_json(raw: &str) -> Self {
        let defaults = Self::default();

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                warn!("Ignoring settings record that is not an object: {}", other);
                return defaults;
            }
            Err(e) => {
                warn!("Ignoring unparsable settings record: {}", e);
                return defaults;
            }
        };

        Self {
            work_seconds: positive(&object, "work").unwrap_or(defaults.work_seconds),
            break_seconds: positive(&object, "break").unwrap_or(defaults.break_seconds),
            long_break_seconds: positive(&object, "long").unwrap_or(defaults.long_break_seconds),
            sessions_before_long: positive(&object, "sessionsBeforeLong")
                .unwrap_or(defaults.sessions_before_long),
            auto_start: flag(&object, "autoStart").unwrap_or(defaults.auto_start),
            sound_enabled: flag(&object, "sound").unwrap_or(defaults.sound_enabled),
            dark_mode: flag(&object, "dark").unwrap_or(defaults.dark_mode),
        }
    }

    /// Copy of this config with the three durations taken from `preset`
    pub fn with_preset(&self, preset: Preset) -> Self {
        let (work, short, long) = preset.minutes();
        Self {
            work_seconds: work * 60,
            break_seconds: short * 60,
            long_break_seconds: long * 60,
            ..*self
        }
    }
}

/// Read a strictly positive integer field that fits in u32
fn positive(object: &Map<String, Value>, key: &str) -> Option<u32> {
    let value = object.get(key)?;
    let number = match value.as_u64() {
        Some(n) => Some(n),
        None => value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 1.0 && f.fract() == 0.0)
            .map(|f| f as u64),
    };

    match number.filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            debug!("Settings field {} has invalid value {}, using default", key, value);
            None
        }
    }
}

fn flag(object: &Map<String, Value>, key: &str) -> Option<bool> {
    object.get(key).and_then(Value::as_bool)
}

/// Named duration sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 25 min work, 5 min break, 15 min long break
    Pomodoro,
    /// 90 min work, 20 min break, 30 min long break
    Deep,
    /// 15 min work, 3 min break, 10 min long break
    Quick,
}

impl Preset {
    /// (work, break, long break) in minutes
    pub fn minutes(&self) -> (u32, u32, u32) {
        match self {
            Preset::Pomodoro => (25, 5, 15),
            Preset::Deep => (90, 20, 30),
            Preset::Quick => (15, 3, 10),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Pomodoro => "pomodoro",
            Preset::Deep => "deep",
            Preset::Quick => "quick",
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = PomoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pomodoro" => Ok(Preset::Pomodoro),
            "deep" => Ok(Preset::Deep),
            "quick" => Ok(Preset::Quick),
            _ => Err(PomoError::UnknownPreset(s.to_string())),
        }
    }
}
