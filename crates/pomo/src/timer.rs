//! The session state machine
//!
//! `Timer` owns the settings, the countdown and the statistics. Every
//! command returns the events it caused, in order. Scheduling (the 1 second
//! tick and the auto-start delay) is left to the caller, see
//! [`crate::runtime`].
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! state is kept.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::PomoError;
use crate::event::{Command, Event};
use crate::session::{Mode, SessionState};
use crate::settings::SessionConfig;
use crate::stats::StatisticsRecord;
use crate::store::{Store, SETTINGS_KEY, STATS_KEY};

/// Interval between ticks while running
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Delay before an automatic start after a completion
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

pub struct Timer<S, C> {
    config: SessionConfig,
    state: SessionState,
    stats: StatisticsRecord,
    store: S,
    clock: C,
}

impl<S: Store, C: Clock> Timer<S, C> {
    /// Load settings and statistics from `store`, rolling the daily
    /// counters over if the stored date is not today.
    pub fn load(store: S, clock: C) -> Self {
        let config = match store.load(SETTINGS_KEY) {
            Ok(Some(raw)) => SessionConfig::from_json(&raw),
            Ok(None) => SessionConfig::default(),
            Err(e) => {
                warn!("Failed to read settings, using defaults: {:#}", e);
                SessionConfig::default()
            }
        };

        let raw_stats = match store.load(STATS_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read statistics, starting empty: {:#}", e);
                None
            }
        };

        let today = clock.today();
        let loaded = StatisticsRecord::load(raw_stats.as_deref(), today);

        let mut timer = Self {
            config,
            state: SessionState::new(config.work_seconds),
            stats: loaded.record,
            store,
            clock,
        };

        if loaded.rolled_over {
            info!(
                "New day {}, daily statistics cleared ({} lifetime sessions kept)",
                today, timer.stats.lifetime_session_count
            );
            timer.persist_stats();
        }

        timer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> &StatisticsRecord {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to simulate a restart
    pub fn into_store(self) -> S {
        self.store
    }

    /// Dispatch a command. Invalid configuration becomes a `Rejected` event.
    pub fn handle(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Toggle => self.toggle(),
            Command::Reset => self.reset(),
            Command::Skip => self.skip(),
            Command::ApplyConfig(config) => self.apply_config(config).unwrap_or_else(|e| {
                vec![Event::Rejected {
                    reason: e.to_string(),
                }]
            }),
            Command::ResetStatistics => self.reset_statistics(),
            Command::Shutdown => Vec::new(),
        }
    }

    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.start_into(&mut events);
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.pause_into(&mut events);
        events
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        if self.state.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Advance the countdown by one second. Ignored while paused.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.state.running {
            return events;
        }

        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.complete_session(&mut events);
        } else {
            events.push(Event::Tick {
                time_left: self.state.time_left,
            });
        }
        events
    }

    /// Finish the current interval now, whatever time is left
    pub fn skip(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.pause_into(&mut events);
        self.complete_session(&mut events);
        events
    }

    /// Pause and rewind the current interval; mode and counters are kept
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.pause_into(&mut events);
        self.state.time_left = self.config.duration(self.state.mode);
        events.push(Event::Reset);
        events.push(Event::Tick {
            time_left: self.state.time_left,
        });
        events
    }

    /// Replace the configuration. A stopped countdown is rewound to the new
    /// duration of the current mode; a running one keeps its time.
    pub fn apply_config(&mut self, config: SessionConfig) -> Result<Vec<Event>, PomoError> {
        config.validate()?;

        let mut events = Vec::new();
        self.config = config;
        self.persist_settings();
        events.push(Event::ConfigApplied { config });

        if !self.state.running {
            let time_left = self.config.duration(self.state.mode);
            if time_left != self.state.time_left {
                self.state.time_left = time_left;
                events.push(Event::Tick { time_left });
            }
        }

        debug!("Applied configuration: {:?}", self.config);
        Ok(events)
    }

    /// Zero every counter. Confirmation is the caller's job.
    pub fn reset_statistics(&mut self) -> Vec<Event> {
        self.stats.reset(self.clock.today());
        self.persist_stats();
        info!("Statistics reset");
        vec![Event::StatsReset, self.stats_event()]
    }

    fn start_into(&mut self, events: &mut Vec<Event>) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        debug!("Started {} with {}s left", self.state.mode, self.state.time_left);
        events.push(Event::Started {
            mode: self.state.mode,
        });
    }

    fn pause_into(&mut self, events: &mut Vec<Event>) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        debug!("Paused {} with {}s left", self.state.mode, self.state.time_left);
        events.push(Event::Paused);
    }

    fn complete_session(&mut self, events: &mut Vec<Event>) {
        self.pause_into(events);
        let today = self.clock.today();

        if self.state.mode == Mode::Work {
            self.stats.record_work_session(self.config.work_seconds, today);

            let long_due = self.stats.daily_session_count % self.config.sessions_before_long == 0;
            let next_mode = if long_due {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            };
            self.state.mode = next_mode;
            self.state.time_left = self.config.duration(next_mode);

            info!(
                "Work session {} of the day complete, next: {}",
                self.stats.daily_session_count, next_mode
            );
            events.push(Event::SessionCompleted { next_mode });
        } else {
            self.stats.roll_over(today);
            self.state.mode = Mode::Work;
            self.state.time_left = self.config.work_seconds;

            info!("Break complete, back to work");
            events.push(Event::BreakCompleted);
        }

        events.push(Event::ModeChanged {
            mode: self.state.mode,
        });
        events.push(Event::Tick {
            time_left: self.state.time_left,
        });
        events.push(self.stats_event());
        self.persist_stats();

        if self.config.auto_start {
            events.push(Event::AutoStartScheduled {
                delay: AUTO_START_DELAY,
            });
        }
    }

    fn stats_event(&self) -> Event {
        Event::StatsUpdated {
            daily: self.stats.daily_session_count,
            lifetime: self.stats.lifetime_session_count,
            total_work_seconds: self.stats.total_work_seconds,
        }
    }

    fn persist_settings(&mut self) {
        match self.config.to_json() {
            Ok(json) => {
                if let Err(e) = self.store.save(SETTINGS_KEY, &json) {
                    warn!("Failed to persist settings: {:#}", e);
                }
            }
            Err(e) => warn!("Failed to serialize settings: {}", e),
        }
    }

    fn persist_stats(&mut self) {
        match self.stats.to_json() {
            Ok(json) => {
                if let Err(e) = self.store.save(STATS_KEY, &json) {
                    warn!("Failed to persist statistics: {:#}", e);
                }
            }
            Err(e) => warn!("Failed to serialize statistics: {}", e),
        }
    }
}
