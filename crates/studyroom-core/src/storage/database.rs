//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed study sessions
//! - Scheduled (planned) sessions
//! - Key-value store for application state

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::calendar::range::{day_range, ScheduledWindow};
use crate::error::{DatabaseError, Result};
use crate::session::{ScheduledSession, StudySession};

use super::{data_dir, SessionStore};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
}

/// SQLite database for session storage.
///
/// The connection sits behind a mutex so the database can be shared
/// with the timer engine across threads.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/studyroom/studyroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studyroom.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database, used by tests and ephemeral runs.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS study_sessions (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    topic_id     INTEGER NOT NULL,
                    duration_min INTEGER NOT NULL,
                    completed_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS scheduled_sessions (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    topic_id     INTEGER NOT NULL,
                    scheduled_at TEXT NOT NULL,
                    duration_min INTEGER NOT NULL,
                    notes        TEXT,
                    is_completed INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                -- Indexes for the calendar window queries
                CREATE INDEX IF NOT EXISTS idx_study_sessions_completed_at
                    ON study_sessions(completed_at);
                CREATE INDEX IF NOT EXISTS idx_scheduled_sessions_scheduled_at
                    ON scheduled_sessions(scheduled_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // ── Completed sessions ──────────────────────────────────────────

    /// Completed sessions whose `completed_at` falls inside `window`,
    /// boundaries included, ordered by timestamp.
    pub fn fetch_completed<Tz: TimeZone>(
        &self,
        window: &ScheduledWindow<Tz>,
    ) -> Result<Vec<StudySession>, DatabaseError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, duration_min, completed_at
             FROM study_sessions
             WHERE completed_at >= ?1 AND completed_at <= ?2
             ORDER BY completed_at",
        )?;
        let rows = stmt.query_map(
            params![ts(&window.start.with_timezone(&Utc)), ts(&window.end.with_timezone(&Utc))],
            |row| {
                Ok(StudySession {
                    id: row.get(0)?,
                    topic_id: row.get(1)?,
                    duration_min: row.get(2)?,
                    completed_at: parse_ts(row.get::<_, String>(3)?, 3)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DatabaseError::from)
    }

    // ── Scheduled sessions ──────────────────────────────────────────

    /// Plan a session and return its row id.
    pub fn add_scheduled(
        &self,
        topic_id: i64,
        scheduled_at: DateTime<Utc>,
        duration_min: u64,
        notes: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO scheduled_sessions (topic_id, scheduled_at, duration_min, notes)
             VALUES (?1, ?2, ?3, ?4)",
            params![topic_id, ts(&scheduled_at), duration_min, notes],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Scheduled sessions whose `scheduled_at` falls inside `window`,
    /// boundaries included, ordered by timestamp.
    pub fn fetch_scheduled<Tz: TimeZone>(
        &self,
        window: &ScheduledWindow<Tz>,
    ) -> Result<Vec<ScheduledSession>, DatabaseError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, topic_id, scheduled_at, duration_min, notes, is_completed
             FROM scheduled_sessions
             WHERE scheduled_at >= ?1 AND scheduled_at <= ?2
             ORDER BY scheduled_at",
        )?;
        let rows = stmt.query_map(
            params![ts(&window.start.with_timezone(&Utc)), ts(&window.end.with_timezone(&Utc))],
            |row| {
                Ok(ScheduledSession {
                    id: row.get(0)?,
                    topic_id: row.get(1)?,
                    scheduled_at: parse_ts(row.get::<_, String>(2)?, 2)?,
                    duration_min: row.get(3)?,
                    notes: row.get(4)?,
                    is_completed: row.get(5)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DatabaseError::from)
    }

    /// Reschedule or annotate a planned session.
    pub fn update_scheduled(
        &self,
        id: i64,
        scheduled_at: DateTime<Utc>,
        duration_min: u64,
        notes: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let changed = self.conn().execute(
            "UPDATE scheduled_sessions
             SET scheduled_at = ?2, duration_min = ?3, notes = ?4
             WHERE id = ?1",
            params![id, ts(&scheduled_at), duration_min, notes],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }

    /// Mark a planned session as done.
    pub fn complete_scheduled(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self.conn().execute(
            "UPDATE scheduled_sessions SET is_completed = 1 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }

    /// Remove a planned session.
    pub fn delete_scheduled(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn()
            .execute("DELETE FROM scheduled_sessions WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        Ok(())
    }

    // ── Stats ───────────────────────────────────────────────────────

    /// Session count and focused minutes for the current local day.
    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        self.stats_in(&day_range(&Local::now()))
    }

    /// Session count and focused minutes inside `window`.
    pub fn stats_in<Tz: TimeZone>(
        &self,
        window: &ScheduledWindow<Tz>,
    ) -> Result<Stats, DatabaseError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM study_sessions
             WHERE completed_at >= ?1 AND completed_at <= ?2",
        )?;
        let stats = stmt.query_row(
            params![ts(&window.start.with_timezone(&Utc)), ts(&window.end.with_timezone(&Utc))],
            |row| {
                Ok(Stats {
                    total_sessions: row.get(0)?,
                    total_focus_min: row.get(1)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Session count and focused minutes over all time.
    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let conn = self.conn();
        let stats = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0) FROM study_sessions",
            [],
            |row| {
                Ok(Stats {
                    total_sessions: row.get(0)?,
                    total_focus_min: row.get(1)?,
                })
            },
        )?;
        Ok(stats)
    }

    // ── Key-value store ─────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn create_session(&self, topic_id: i64, duration_min: u64) -> Result<i64, DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO study_sessions (topic_id, duration_min, completed_at)
             VALUES (?1, ?2, ?3)",
            params![topic_id, duration_min, ts(&Utc::now())],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

// Fixed-width UTC timestamps so string comparison in SQL matches
// chronological order.
fn ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(raw: String, col: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}
