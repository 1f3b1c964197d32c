//! # Studyroom Core Library
//!
//! This library provides the core business logic for the Studyroom
//! study planner. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven countdown state machine that
//!   persists a study session exactly once per completed countdown
//! - **Calendar**: pure day/week/month window math, per-day bucketing
//!   and hour-range inference for calendar views
//! - **Storage**: SQLite-based session storage and TOML-based
//!   configuration
//! - **Telemetry**: best-effort event sink decoupling analytics from
//!   the timer
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`SharedTimer`] / [`ClockDriver`]: one engine, one ticking task
//! - [`Database`]: session and statistics persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod timer;

pub use calendar::{day_range, group_by_local_date, infer_hour_range, month_range, week_range,
    HourRange, ScheduledWindow};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use session::{ScheduledSession, StudySession};
pub use storage::{Config, Database, SessionStore, Stats};
pub use telemetry::{LogSink, MemorySink, NullSink, TelemetrySink};
pub use timer::{ClockDriver, ClockGuard, Phase, SharedTimer, TimerEngine, TimerSnapshot,
    DEFAULT_DURATION_SECS};
