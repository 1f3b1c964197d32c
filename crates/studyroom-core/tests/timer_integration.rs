//! End-to-end timer flows against the real SQLite store.
//!
//! These tests exercise the full completion path: engine, persistence
//! adapter, telemetry sink and the calendar queries that read the
//! persisted rows back.

use std::sync::Arc;

use chrono::Local;
use studyroom_core::calendar::day_range;
use studyroom_core::storage::Database;
use studyroom_core::telemetry::MemorySink;
use studyroom_core::timer::{Phase, TimerEngine, TimerSnapshot, DEFAULT_DURATION_SECS};

fn setup(duration_secs: u64) -> (TimerEngine, Arc<Database>, Arc<MemorySink>) {
    let db = Arc::new(Database::open_memory().unwrap());
    let sink = Arc::new(MemorySink::new());
    let engine = TimerEngine::new(duration_secs, db.clone(), sink.clone());
    (engine, db, sink)
}

#[test]
fn test_default_countdown_persists_one_session() {
    let (mut engine, db, sink) = setup(DEFAULT_DURATION_SECS);
    engine.start(42, || {});

    for _ in 0..DEFAULT_DURATION_SECS - 1 {
        assert!(engine.tick().is_none());
    }
    let event = engine.tick().expect("final tick completes the session");
    assert_eq!(event.kind(), "session_completed");

    let stats = db.stats_all().unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_focus_min, 25);

    let today = db.fetch_completed(&day_range(&Local::now())).unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].topic_id, 42);
    assert_eq!(today[0].duration_min, 25);

    let kinds: Vec<_> = sink.drain().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["session_started", "session_completed"]);
}

#[test]
fn test_pause_resume_does_not_double_persist() {
    let (mut engine, db, _) = setup(120);
    engine.start(7, || {});

    for _ in 0..50 {
        engine.tick();
    }
    engine.pause().unwrap();
    engine.resume().unwrap();
    for _ in 0..70 {
        engine.tick();
    }

    assert_eq!(engine.phase(), Phase::Idle);
    let stats = db.stats_all().unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_focus_min, 2);
}

#[test]
fn test_reset_leaves_no_trace() {
    let (mut engine, db, _) = setup(300);
    engine.start(1, || {});
    for _ in 0..100 {
        engine.tick();
    }
    engine.reset().unwrap();

    assert_eq!(db.stats_all().unwrap().total_sessions, 0);

    engine.start(2, || {});
    for _ in 0..300 {
        engine.tick();
    }
    let today = db.fetch_completed(&day_range(&Local::now())).unwrap();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].topic_id, 2);
}

#[test]
fn test_snapshot_survives_kv_roundtrip() {
    let (mut engine, db, sink) = setup(600);
    engine.start(9, || {});
    for _ in 0..250 {
        engine.tick();
    }

    // Persist the snapshot the way the CLI does between invocations.
    let json = serde_json::to_string(&engine.snapshot()).unwrap();
    db.kv_set("timer_snapshot", &json).unwrap();
    drop(engine);

    let raw = db.kv_get("timer_snapshot").unwrap().unwrap();
    let snapshot: TimerSnapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.phase, Phase::Running);

    let mut restored = TimerEngine::from_snapshot(snapshot, db.clone(), sink);
    assert_eq!(restored.phase(), Phase::Paused);
    assert_eq!(restored.remaining_secs(), 350);
    assert_eq!(restored.linked_topic_id(), Some(9));

    restored.resume().unwrap();
    for _ in 0..350 {
        restored.tick();
    }
    assert_eq!(db.stats_all().unwrap().total_sessions, 1);
    assert_eq!(db.stats_all().unwrap().total_focus_min, 10);
}
