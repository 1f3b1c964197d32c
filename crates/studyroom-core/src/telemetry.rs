//! Best-effort telemetry sink.
//!
//! Recording is fire-and-forget: a sink must swallow its own failures
//! so a broken analytics backend can never stall or crash the timer.

use std::sync::Mutex;

use crate::events::Event;

/// Receiver for timer lifecycle events.
///
/// Implementations must be infallible from the caller's point of view.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: &Event);
}

/// Sink that logs every event through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn record(&self, event: &Event) {
        tracing::info!(kind = event.kind(), topic_id = event.topic_id(), "timer event");
    }
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&self, _event: &Event) {}
}

/// Sink that buffers events in memory. The GUI drains it to render
/// activity; tests use it to assert on emitted events.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all buffered events.
    pub fn drain(&self) -> Vec<Event> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *events)
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TelemetrySink for MemorySink {
    fn record(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_memory_sink_buffers_and_drains() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.record(&Event::SessionStarted {
            topic_id: 1,
            duration_secs: 1500,
            at: Utc::now(),
        });
        sink.record(&Event::SessionStopped {
            topic_id: 1,
            at: Utc::now(),
        });
        assert_eq!(sink.len(), 2);

        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind(), "session_started");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_null_sink_discards() {
        let sink = NullSink;
        sink.record(&Event::SessionStopped {
            topic_id: 9,
            at: Utc::now(),
        });
    }
}
