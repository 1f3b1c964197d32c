//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - the caller (or a [`super::clock::ClockDriver`])
//! invokes `tick()` once per elapsed second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^       |
//!   +-------+  (countdown reaches zero, or reset)
//! ```
//!
//! At most one session can be live at a time: `start()` only acts from
//! `Idle`, so a running countdown must complete or be reset before the
//! next one begins. When the countdown reaches zero the engine clears
//! its own state *before* persisting the session, which makes the
//! persisted record at-most-once even if persistence fails mid-way.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::SessionStore;
use crate::telemetry::TelemetrySink;

/// Default countdown length: one 25-minute focus block.
pub const DEFAULT_DURATION_SECS: u64 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

/// Serializable view of the engine state.
///
/// The persistence and telemetry handles and the completion callback
/// are process-local and never serialized; see
/// [`TimerEngine::from_snapshot`] for how a snapshot comes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub duration_secs: u64,
    pub remaining_secs: u64,
    pub linked_topic_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl TimerSnapshot {
    /// Remaining time rendered as MM:SS.
    pub fn format_remaining(&self) -> String {
        format_secs(self.remaining_secs)
    }
}

type CompletionCallback = Box<dyn FnOnce() + Send>;

/// Core timer engine.
///
/// Counts a single focus session down one second per `tick()`. All
/// state lives in the engine instance; persistence and telemetry are
/// injected so hosts and tests choose their own backends.
pub struct TimerEngine {
    phase: Phase,
    duration_secs: u64,
    remaining_secs: u64,
    linked_topic_id: Option<i64>,
    on_complete: Option<CompletionCallback>,
    store: Arc<dyn SessionStore>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl TimerEngine {
    /// Create an idle engine with the given countdown length.
    pub fn new(
        duration_secs: u64,
        store: Arc<dyn SessionStore>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            duration_secs,
            remaining_secs: duration_secs,
            linked_topic_id: None,
            on_complete: None,
            store,
            telemetry,
        }
    }

    /// Rebuild an engine from a persisted snapshot.
    ///
    /// A snapshot taken mid-run comes back `Paused`: the completion
    /// callback cannot survive the process boundary, so the countdown
    /// position is kept but the caller must `resume()` explicitly.
    pub fn from_snapshot(
        snapshot: TimerSnapshot,
        store: Arc<dyn SessionStore>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let phase = match snapshot.phase {
            Phase::Running => Phase::Paused,
            other => other,
        };
        let remaining_secs = if phase == Phase::Idle {
            snapshot.duration_secs
        } else {
            snapshot.remaining_secs
        };
        Self {
            phase,
            duration_secs: snapshot.duration_secs,
            remaining_secs,
            linked_topic_id: snapshot.linked_topic_id,
            on_complete: None,
            store,
            telemetry,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn linked_topic_id(&self) -> Option<i64> {
        self.linked_topic_id
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Remaining time rendered as MM:SS.
    pub fn format_remaining(&self) -> String {
        format_secs(self.remaining_secs)
    }

    /// Capture the serializable state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            linked_topic_id: self.linked_topic_id,
            updated_at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown for `topic_id`.
    ///
    /// Only acts from `Idle`; a live session (running or paused) is
    /// never interrupted and the call is a no-op returning `None`.
    /// `on_complete` fires after the session has been persisted.
    pub fn start(
        &mut self,
        topic_id: i64,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> Option<Event> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.phase = Phase::Running;
        self.remaining_secs = self.duration_secs;
        self.linked_topic_id = Some(topic_id);
        self.on_complete = Some(Box::new(on_complete));
        self.emit(Event::SessionStarted {
            topic_id,
            duration_secs: self.duration_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::SessionCompleted)` on the tick that reaches
    /// zero and `None` otherwise. Ticking a non-running engine is a
    /// no-op.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != Phase::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.finish()
    }

    /// Suspend a running countdown, keeping its position and topic.
    pub fn pause(&mut self) -> Option<Event> {
        if self.phase != Phase::Running {
            return None;
        }
        let topic_id = self.linked_topic_id?;
        self.phase = Phase::Paused;
        self.emit(Event::SessionPaused {
            topic_id,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Continue a paused countdown from where it stopped.
    pub fn resume(&mut self) -> Option<Event> {
        if self.phase != Phase::Paused {
            return None;
        }
        let topic_id = self.linked_topic_id?;
        self.phase = Phase::Running;
        self.emit(Event::SessionResumed {
            topic_id,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the live session. Nothing is persisted.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Idle;
        self.remaining_secs = self.duration_secs;
        self.on_complete = None;
        let topic_id = self.linked_topic_id.take()?;
        self.emit(Event::SessionStopped {
            topic_id,
            at: Utc::now(),
        })
    }

    /// Change the countdown length. Only allowed while `Idle`; returns
    /// whether the new length was applied.
    pub fn configure(&mut self, duration_secs: u64) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        true
    }

    // Clears engine state first, then persists, then notifies. The
    // order makes the persisted record at-most-once: a failure after
    // the clear loses the record instead of risking a duplicate.
    fn finish(&mut self) -> Option<Event> {
        let topic_id = self.linked_topic_id.take()?;
        let on_complete = self.on_complete.take();
        let duration_min = self.duration_secs / 60;
        self.phase = Phase::Idle;
        self.remaining_secs = self.duration_secs;

        if let Err(err) = self.store.create_session(topic_id, duration_min) {
            tracing::warn!(topic_id, %err, "failed to persist completed session, record lost");
            return None;
        }

        let event = Event::SessionCompleted {
            topic_id,
            duration_min,
            at: Utc::now(),
        };
        self.telemetry.record(&event);
        if let Some(callback) = on_complete {
            callback();
        }
        Some(event)
    }

    fn emit(&self, event: Event) -> Option<Event> {
        self.telemetry.record(&event);
        Some(event)
    }
}

fn format_secs(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
