//! Shared timer handle and the once-per-second clock driver.
//!
//! Every view of the application drives the same engine, so the handle
//! is a cheap clone and the driver enforces that only one ticking task
//! exists at a time. Detaching the driver stops future ticks without
//! touching the countdown position.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::events::Event;
use super::engine::TimerEngine;

/// Cheap-clone handle to the single timer engine.
#[derive(Clone)]
pub struct SharedTimer {
    engine: Arc<Mutex<TimerEngine>>,
    driver_attached: Arc<AtomicBool>,
}

impl SharedTimer {
    pub fn new(engine: TimerEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            driver_attached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run `f` against the engine under the lock.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut TimerEngine) -> R) -> R {
        let mut engine = self.engine.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut engine)
    }

    /// Advance the countdown by one second.
    pub fn tick(&self) -> Option<Event> {
        self.with_engine(|engine| engine.tick())
    }
}

/// Spawns the 1-second tick task for a [`SharedTimer`].
pub struct ClockDriver;

impl ClockDriver {
    /// Attach a ticking task to `timer`.
    ///
    /// At most one driver may be attached to a timer at a time: while
    /// one is live, further calls return `None`. Dropping the returned
    /// guard stops the task and frees the slot; the countdown position
    /// survives and a re-attached driver resumes from it.
    pub fn attach(timer: &SharedTimer) -> Option<ClockGuard> {
        if timer
            .driver_attached
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }

        let ticking = timer.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                ticking.tick();
            }
        });

        Some(ClockGuard {
            handle,
            driver_attached: timer.driver_attached.clone(),
        })
    }
}

/// Keeps the tick task alive; dropping it detaches the driver.
pub struct ClockGuard {
    handle: JoinHandle<()>,
    driver_attached: Arc<AtomicBool>,
}

impl Drop for ClockGuard {
    fn drop(&mut self) {
        self.handle.abort();
        self.driver_attached.store(false, Ordering::SeqCst);
    }
}
