//! Domain records for planned and completed study sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A session planned on the calendar for a specific instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub id: i64,
    pub topic_id: i64,
    /// Planned start instant.
    pub scheduled_at: DateTime<Utc>,
    /// Planned length in minutes.
    pub duration_min: u64,
    pub notes: Option<String>,
    pub is_completed: bool,
}

impl ScheduledSession {
    /// Planned end instant.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(self.duration_min as i64)
    }
}

/// A completed countdown, recorded once when the timer reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub topic_id: i64,
    /// Focused length in minutes.
    pub duration_min: u64,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scheduled_session_end() {
        let session = ScheduledSession {
            id: 1,
            topic_id: 2,
            scheduled_at: Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap(),
            duration_min: 50,
            notes: None,
            is_completed: false,
        };
        assert_eq!(
            session.ends_at(),
            Utc.with_ymd_and_hms(2025, 3, 10, 14, 50, 0).unwrap()
        );
    }
}
