use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use serde::Serialize;
use studyroom_core::storage::{Config, Database};
use studyroom_core::telemetry::LogSink;
use studyroom_core::timer::{ClockDriver, Phase, SharedTimer, TimerEngine, TimerSnapshot};
use studyroom_core::Event;

const SNAPSHOT_KEY: &str = "timer_snapshot";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Begin a focus countdown for a topic
    Start {
        /// Topic to study
        #[arg(long)]
        topic: i64,
        /// Countdown length in minutes (defaults to the configured length)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Print current timer state as JSON
    Status,
    /// Suspend the running countdown
    Pause,
    /// Continue a paused countdown
    Resume,
    /// Abandon the current countdown
    Reset,
    /// Drive the countdown in the foreground until it completes
    Watch,
}

#[derive(Serialize)]
struct StatusView {
    #[serde(flatten)]
    snapshot: TimerSnapshot,
    display: String,
}

fn status_view(engine: &TimerEngine) -> StatusView {
    let snapshot = engine.snapshot();
    let display = snapshot.format_remaining();
    StatusView { snapshot, display }
}

/// Load the engine from the kv store and replay the seconds that
/// elapsed while no process was around. A countdown that ran out in
/// the meantime completes (and persists) here; the completion event is
/// returned so callers can print it.
fn load_engine(db: &Arc<Database>) -> (TimerEngine, Option<Event>) {
    let store = db.clone();
    let sink = Arc::new(LogSink);
    let stored = db
        .kv_get(SNAPSHOT_KEY)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<TimerSnapshot>(&json).ok());

    let Some(snapshot) = stored else {
        let config = Config::load_or_default();
        return (
            TimerEngine::new(config.focus_duration_secs(), store, sink),
            None,
        );
    };

    let was_running = snapshot.phase == Phase::Running;
    let elapsed = (Utc::now() - snapshot.updated_at).num_seconds().max(0) as u64;
    let mut engine = TimerEngine::from_snapshot(snapshot, store, sink);

    let mut completed = None;
    if was_running {
        // The snapshot restores paused; the countdown was logically
        // still running, so resume and catch up to the present.
        engine.resume();
        for _ in 0..elapsed.min(engine.duration_secs()) {
            if let Some(event) = engine.tick() {
                completed = Some(event);
                break;
            }
        }
    }
    (engine, completed)
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&engine.snapshot())?;
    db.kv_set(SNAPSHOT_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Arc::new(Database::open()?);
    let (mut engine, completed) = load_engine(&db);
    if let Some(event) = &completed {
        println!("{}", serde_json::to_string_pretty(event)?);
    }

    match action {
        TimerAction::Start { topic, minutes } => {
            if let Some(minutes) = minutes {
                engine.configure(minutes * 60);
            }
            if let Some(event) = engine.start(topic, || {}) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                eprintln!("timer already live; reset it first");
                println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
        }
        TimerAction::Pause => {
            if let Some(event) = engine.pause() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
            }
        }
        TimerAction::Resume => {
            if let Some(event) = engine.resume() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
            }
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
            }
        }
        TimerAction::Watch => {
            save_engine(&db, &engine)?;
            return watch(&db, engine);
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}

/// Foreground mode: attach the clock driver and render the countdown
/// until it reaches zero.
fn watch(db: &Database, engine: TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    if !engine.is_running() {
        eprintln!("timer is not running; start it first");
        println!("{}", serde_json::to_string_pretty(&status_view(&engine))?);
        return Ok(());
    }

    let timer = SharedTimer::new(engine);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let _guard = match ClockDriver::attach(&timer) {
            Some(guard) => guard,
            None => return,
        };
        loop {
            tokio::time::sleep(Duration::from_millis(250)).await;
            let (running, display) =
                timer.with_engine(|e| (e.is_running(), e.format_remaining()));
            if !running {
                break;
            }
            eprint!("\r{display} ");
        }
        eprintln!();
    });

    timer.with_engine(|e| save_engine(db, e))?;
    let view = timer.with_engine(|e| status_view(e));
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
