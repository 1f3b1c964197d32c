use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every timer state change produces an Event.
/// The GUI polls for events; the telemetry sink records them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        topic_id: i64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        topic_id: i64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        topic_id: i64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown abandoned before reaching zero. Nothing is persisted.
    SessionStopped {
        topic_id: i64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero and the session record was persisted.
    SessionCompleted {
        topic_id: i64,
        duration_min: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short stable name for the event variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::SessionPaused { .. } => "session_paused",
            Event::SessionResumed { .. } => "session_resumed",
            Event::SessionStopped { .. } => "session_stopped",
            Event::SessionCompleted { .. } => "session_completed",
        }
    }

    /// The study topic this event refers to.
    pub fn topic_id(&self) -> i64 {
        match self {
            Event::SessionStarted { topic_id, .. }
            | Event::SessionPaused { topic_id, .. }
            | Event::SessionResumed { topic_id, .. }
            | Event::SessionStopped { topic_id, .. }
            | Event::SessionCompleted { topic_id, .. } => *topic_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_tag() {
        let event = Event::SessionCompleted {
            topic_id: 7,
            duration_min: 25,
            at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"SessionCompleted\""));
        assert!(json.contains("\"topic_id\":7"));
    }

    #[test]
    fn test_event_kind_and_topic() {
        let event = Event::SessionPaused {
            topic_id: 3,
            remaining_secs: 900,
            at: Utc::now(),
        };
        assert_eq!(event.kind(), "session_paused");
        assert_eq!(event.topic_id(), 3);
    }
}
