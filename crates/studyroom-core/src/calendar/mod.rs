//! Calendar math: time windows, per-day bucketing, hour-range inference.
//!
//! All functions are pure and generic over [`chrono::TimeZone`] so the
//! application runs them against `Local` while tests pin a fixed zone.

pub mod bucket;
pub mod hours;
pub mod range;

pub use bucket::group_by_local_date;
pub use hours::{infer_hour_range, HourRange};
pub use range::{day_range, month_range, week_range, ScheduledWindow};
