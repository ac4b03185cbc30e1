//! pomo-core - Shared functionality for the pomo timer
//!
//! Standard on-disk locations and the small formatting helpers used by both
//! the library and the terminal front end.

pub mod format;
pub mod paths;

pub use paths::Paths;
