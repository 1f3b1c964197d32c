pub mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, Stats};

use std::path::PathBuf;

use crate::error::DatabaseError;

/// Adapter the timer engine persists completed countdowns through.
///
/// The engine calls this exactly once per completed session, after it
/// has already cleared its own state.
pub trait SessionStore: Send + Sync {
    /// Insert a completed session and return its row id.
    fn create_session(&self, topic_id: i64, duration_min: u64) -> Result<i64, DatabaseError>;
}

/// Returns `~/.config/studyroom[-dev]/` based on STUDYROOM_ENV.
///
/// Set STUDYROOM_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyroom-dev")
    } else {
        base_dir.join("studyroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
