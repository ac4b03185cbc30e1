use std::fs;

use chrono::NaiveDate;
use pomo::store::{SETTINGS_KEY, STATS_KEY};
use pomo::{Event, FileStore, FixedClock, Mode, SessionConfig, StatisticsRecord, Store, Timer};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load(dir: &TempDir, today: NaiveDate) -> Timer<FileStore, FixedClock> {
    let store = FileStore::new(dir.path()).unwrap();
    Timer::load(store, FixedClock::new(today))
}

#[test]
fn test_fresh_install_uses_defaults_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let timer = load(&dir, date(2026, 10, 16));

    assert_eq!(*timer.config(), SessionConfig::default());
    assert_eq!(timer.state().time_left, 1500);
    assert!(!dir.path().join("pomodoro_stats.json").exists());
    assert!(!dir.path().join("pomodoro_settings.json").exists());
}

#[test]
fn test_default_day_end_to_end() {
    let dir = TempDir::new().unwrap();
    let today = date(2026, 10, 16);

    let mut timer = load(&dir, today);
    timer.start();
    let mut completed = Vec::new();
    for _ in 0..1500 {
        completed.extend(
            timer
                .tick()
                .into_iter()
                .filter(|e| matches!(e, Event::SessionCompleted { .. })),
        );
    }
    assert_eq!(
        completed,
        vec![Event::SessionCompleted {
            next_mode: Mode::ShortBreak
        }]
    );
    assert_eq!(timer.state().time_left, 300);

    timer.skip();
    assert_eq!(timer.state().mode, Mode::Work);
    assert_eq!(timer.state().time_left, 1500);

    // Simulated restart the same day keeps today's counters
    drop(timer);
    let timer = load(&dir, today);
    assert_eq!(timer.stats().daily_session_count, 1);
    assert_eq!(timer.stats().lifetime_session_count, 1);
    assert_eq!(timer.stats().total_work_seconds, 1500);
    assert_eq!(timer.state().mode, Mode::Work);
}

#[test]
fn test_browser_records_are_understood() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("pomodoro_settings.json"),
        r#"{"work":3000,"break":600,"long":1800,"sessionsBeforeLong":3,"autoStart":true,"sound":false,"dark":true}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pomodoro_stats.json"),
        r#"{"sessionCount":2,"totalSessions":40,"totalWorkTime":6000,"lastDate":"Fri Oct 16 2026"}"#,
    )
    .unwrap();

    let timer = load(&dir, date(2026, 10, 16));
    assert_eq!(timer.config().work_seconds, 3000);
    assert_eq!(timer.config().sessions_before_long, 3);
    assert!(timer.config().auto_start);
    assert!(!timer.config().sound_enabled);
    assert_eq!(timer.state().time_left, 3000);
    assert_eq!(timer.stats().daily_session_count, 2);
    assert_eq!(timer.stats().lifetime_session_count, 40);
}

#[test]
fn test_rollover_written_once() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store
        .save(
            STATS_KEY,
            r#"{"sessionCount":3,"totalSessions":10,"totalWorkTime":4500,"lastDate":"2026-10-15"}"#,
        )
        .unwrap();

    let timer = load(&dir, date(2026, 10, 16));
    assert_eq!(timer.stats().daily_session_count, 0);
    assert_eq!(timer.stats().total_work_seconds, 0);
    assert_eq!(timer.stats().lifetime_session_count, 10);

    let stored = store.load(STATS_KEY).unwrap().unwrap();
    assert!(stored.contains("2026-10-16"));

    let again = load(&dir, date(2026, 10, 16));
    assert_eq!(*again.stats(), *timer.stats());
}

#[test]
fn test_reset_statistics_then_restart() {
    let dir = TempDir::new().unwrap();
    let today = date(2026, 10, 16);

    let mut timer = load(&dir, today);
    for _ in 0..3 {
        timer.skip();
        timer.skip();
    }
    assert_eq!(timer.stats().lifetime_session_count, 3);
    timer.reset_statistics();
    drop(timer);

    let timer = load(&dir, today);
    assert_eq!(*timer.stats(), StatisticsRecord::new(today));
}

#[test]
fn test_rejected_config_is_not_written() {
    let dir = TempDir::new().unwrap();
    let mut timer = load(&dir, date(2026, 10, 16));

    let bad = SessionConfig {
        break_seconds: 0,
        ..Default::default()
    };
    assert!(timer.apply_config(bad).is_err());

    let store = FileStore::new(dir.path()).unwrap();
    assert!(store.load(SETTINGS_KEY).unwrap().is_none());
}

#[test]
fn test_corrupt_records_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pomodoro_settings.json"), "{not json").unwrap();
    fs::write(dir.path().join("pomodoro_stats.json"), "null").unwrap();

    let mut timer = load(&dir, date(2026, 10, 16));
    assert_eq!(*timer.config(), SessionConfig::default());
    assert_eq!(timer.stats().lifetime_session_count, 0);

    // The next completion overwrites the corrupt record
    timer.skip();
    let store = FileStore::new(dir.path()).unwrap();
    let stored = store.load(STATS_KEY).unwrap().unwrap();
    assert!(stored.contains("\"totalSessions\": 1"));
}
