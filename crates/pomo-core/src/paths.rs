//! Standard paths used by pomo

use std::path::{Path, PathBuf};

/// Standard pomo paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory (~/.local/share/pomo)
    pub data: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("pomo");

        Self { data }
    }

    /// Root every path under `root` (used for `--data-dir` and tests)
    pub fn with_root(root: &Path) -> Self {
        Self {
            data: root.to_path_buf(),
        }
    }

    /// Path of the JSON file backing a durable record
    pub fn record(&self, key: &str) -> PathBuf {
        self.data.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_ends_in_pomo() {
        let paths = Paths::new();
        assert!(paths.data.ends_with("pomo"));
    }

    #[test]
    fn test_record_path() {
        let paths = Paths::with_root(Path::new("/tmp/pomo-test"));
        assert_eq!(
            paths.record("pomodoro_stats"),
            PathBuf::from("/tmp/pomo-test/pomodoro_stats.json")
        );
    }
}
