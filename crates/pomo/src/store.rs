//! Durable record storage
//!
//! Settings and statistics are independent JSON records addressed by key:
//! - `pomodoro_settings`: ~/.local/share/pomo/pomodoro_settings.json
//! - `pomodoro_stats`: ~/.local/share/pomo/pomodoro_stats.json

use anyhow::{Context, Result};
use pomo_core::Paths;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the settings record
pub const SETTINGS_KEY: &str = "pomodoro_settings";
/// Key of the statistics record
pub const STATS_KEY: &str = "pomodoro_stats";

/// Key-value storage of raw JSON documents
pub trait Store {
    /// Read a record, `None` if it was never written
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write a record, replacing any previous value
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store keeping one JSON file per key in a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: Paths,
}

impl FileStore {
    /// Create a file store rooted at the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create pomo data directory: {}", data_dir.display())
        })?;

        Ok(Self {
            paths: Paths::with_root(data_dir),
        })
    }

    /// Path of the file backing `key`
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.paths.record(key)
    }
}

impl Store for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write record: {}", path.display()))
    }
}

/// In-memory store, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record before handing the store to a timer
    pub fn with_record(mut self, key: &str, value: &str) -> Self {
        self.records.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
