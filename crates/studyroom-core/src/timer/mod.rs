//! Timer engine and its clock driver.

pub mod clock;
pub mod engine;

pub use clock::{ClockDriver, ClockGuard, SharedTimer};
pub use engine::{Phase, TimerEngine, TimerSnapshot, DEFAULT_DURATION_SECS};
