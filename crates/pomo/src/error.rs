//! Timer errors

use thiserror::Error;

/// Errors surfaced to the caller of a timer command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PomoError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Unknown preset: {0} (expected pomodoro, deep or quick)")]
    UnknownPreset(String),
}
