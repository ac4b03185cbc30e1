//! Session statistics
//!
//! Tracks three counters scoped two ways:
//! - today's completed sessions and work time (cleared on day rollover)
//! - lifetime completed sessions (cleared only by an explicit reset)

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Date format written to the record
const DATE_FORMAT: &str = "%Y-%m-%d";
/// Browser `Date.toDateString()` format, accepted on load
const LEGACY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Daily and lifetime counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsRecord {
    /// Work sessions completed on `last_recorded_date`
    pub daily_session_count: u32,
    /// Work sessions completed since the last explicit reset
    pub lifetime_session_count: u32,
    /// Work seconds completed on `last_recorded_date`
    pub total_work_seconds: u64,
    pub last_recorded_date: NaiveDate,
}

/// On-disk shape of `pomodoro_stats`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredStats {
    session_count: u32,
    total_sessions: u32,
    total_work_time: u64,
    last_date: String,
}

/// Result of decoding a stored record against today's date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedStats {
    pub record: StatisticsRecord,
    /// The stored date was not today and the daily counters were cleared
    pub rolled_over: bool,
}

impl StatisticsRecord {
    /// Empty record dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            daily_session_count: 0,
            lifetime_session_count: 0,
            total_work_seconds: 0,
            last_recorded_date: today,
        }
    }

    /// Count one completed work interval of `work_seconds`
    pub fn record_work_session(&mut self, work_seconds: u32, today: NaiveDate) {
        self.roll_over(today);
        self.daily_session_count = self.daily_session_count.saturating_add(1);
        self.lifetime_session_count = self.lifetime_session_count.saturating_add(1);
        self.total_work_seconds = self
            .total_work_seconds
            .saturating_add(u64::from(work_seconds));
        self.last_recorded_date = today;
    }

    /// Clear the daily counters if `today` is a different day.
    /// Returns whether anything was cleared.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_recorded_date == today {
            return false;
        }

        self.daily_session_count = 0;
        self.total_work_seconds = 0;
        self.last_recorded_date = today;
        true
    }

    /// Zero every counter, including the lifetime count
    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    /// Encode as the `pomodoro_stats` JSON record
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&StoredStats {
            session_count: self.daily_session_count,
            total_sessions: self.lifetime_session_count,
            total_work_time: self.total_work_seconds,
            last_date: self.last_recorded_date.format(DATE_FORMAT).to_string(),
        })
    }

    /// Decode a stored record (or its absence) and apply day rollover
    pub fn load(raw: Option<&str>, today: NaiveDate) -> LoadedStats {
        let object = raw.and_then(|raw| match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => Some(object),
            Ok(other) => {
                warn!("Ignoring statistics record that is not an object: {}", other);
                None
            }
            Err(e) => {
                warn!("Ignoring unparsable statistics record: {}", e);
                None
            }
        });

        let Some(object) = object else {
            return LoadedStats {
                record: Self::new(today),
                rolled_over: false,
            };
        };

        let daily = counter(&object, "sessionCount");
        let lifetime = counter(&object, "totalSessions");
        let work = counter(&object, "totalWorkTime");
        let stored_date = object
            .get("lastDate")
            .and_then(Value::as_str)
            .and_then(parse_date);

        let mut record = Self {
            daily_session_count: u32::try_from(daily).unwrap_or(u32::MAX),
            lifetime_session_count: u32::try_from(lifetime).unwrap_or(u32::MAX),
            total_work_seconds: work,
            last_recorded_date: stored_date.unwrap_or(today),
        };
        if record.lifetime_session_count < record.daily_session_count {
            debug!(
                "Stored lifetime count {} below daily count {}, raising it",
                record.lifetime_session_count, record.daily_session_count
            );
            record.lifetime_session_count = record.daily_session_count;
        }

        let rolled_over = match stored_date {
            Some(_) => record.roll_over(today),
            None => {
                record.daily_session_count = 0;
                record.total_work_seconds = 0;
                true
            }
        };

        LoadedStats {
            record,
            rolled_over,
        }
    }
}

/// Read a non-negative integer field, 0 when missing or invalid
fn counter(object: &Map<String, Value>, key: &str) -> u64 {
    let Some(value) = object.get(key) else {
        return 0;
    };

    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => f as u64,
        _ => {
            debug!("Statistics field {} has invalid value {}, using 0", key, value);
            0
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, LEGACY_DATE_FORMAT))
        .ok()
}
