//! Hour-range inference for the day-view grid.
//!
//! The grid only renders the hours worth showing: a default working
//! window when the day is empty, otherwise the span covered by the
//! day's sessions widened by a margin and clamped to the clock.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{ScheduledSession, StudySession};

const DEFAULT_START_HOUR: u32 = 6;
const DEFAULT_END_HOUR: u32 = 22;
const MARGIN_HOURS: u32 = 2;
const MIN_SPAN_HOURS: u32 = 8;

/// An inclusive range of clock hours, `0..=23`, start <= end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl HourRange {
    /// Iterate the hours in the range, both ends included.
    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start_hour..=self.end_hour
    }

    pub fn span(&self) -> u32 {
        self.end_hour - self.start_hour
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
        }
    }
}

/// Infer the hour range covering a day's scheduled and completed
/// sessions, interpreted in `tz`.
///
/// An empty day yields the default range. Otherwise the scan takes the
/// earliest local start hour and the latest local end hour (start hour
/// plus the session length rounded up to whole hours), widens both
/// ends by a two-hour margin clamped to `0..=23`, and finally unions
/// in the default range whenever the result spans less than eight
/// hours, so a lone session never produces a sliver of a grid.
pub fn infer_hour_range<Tz: TimeZone>(
    scheduled: &[ScheduledSession],
    completed: &[StudySession],
    tz: &Tz,
) -> HourRange {
    let marks = scheduled
        .iter()
        .map(|s| (s.scheduled_at, s.duration_min))
        .chain(completed.iter().map(|s| (s.completed_at, s.duration_min)));

    let mut bounds: Option<(u32, u32)> = None;
    for (at, duration_min) in marks {
        let start = local_hour(&at, tz);
        let end = start + duration_min.div_ceil(60) as u32;
        bounds = Some(match bounds {
            None => (start, end),
            Some((lo, hi)) => (lo.min(start), hi.max(end)),
        });
    }

    let Some((min_hour, max_hour)) = bounds else {
        return HourRange::default();
    };

    let mut start_hour = min_hour.saturating_sub(MARGIN_HOURS);
    let mut end_hour = (max_hour + MARGIN_HOURS).min(23);

    if end_hour - start_hour < MIN_SPAN_HOURS {
        start_hour = start_hour.min(DEFAULT_START_HOUR);
        end_hour = end_hour.max(DEFAULT_END_HOUR);
    }

    HourRange {
        start_hour,
        end_hour,
    }
}

fn local_hour<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> u32 {
    at.with_timezone(tz).hour()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_at(h: u32, min: u32, duration_min: u64) -> ScheduledSession {
        ScheduledSession {
            id: 1,
            topic_id: 1,
            scheduled_at: Utc.with_ymd_and_hms(2025, 3, 10, h, min, 0).unwrap(),
            duration_min,
            notes: None,
            is_completed: false,
        }
    }

    fn completed_at(h: u32, duration_min: u64) -> StudySession {
        StudySession {
            id: 1,
            topic_id: 1,
            duration_min,
            completed_at: Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_day_gets_default_range() {
        let range = infer_hour_range(&[], &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 6, end_hour: 22 });
    }

    #[test]
    fn test_short_day_unions_default_range() {
        // One 10:00 session: margin gives [8, 13], span 5 < 8, so the
        // default window is unioned in.
        let range = infer_hour_range(&[scheduled_at(10, 0, 30)], &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 6, end_hour: 22 });
    }

    #[test]
    fn test_wide_day_keeps_scanned_bounds() {
        let sessions = vec![scheduled_at(7, 0, 60), scheduled_at(18, 0, 120)];
        // Scan: [7, 20]; margin: [5, 22]; span 17 >= 8.
        let range = infer_hour_range(&sessions, &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 5, end_hour: 22 });
    }

    #[test]
    fn test_early_session_widens_past_default_start() {
        let sessions = vec![scheduled_at(4, 0, 60), scheduled_at(15, 0, 60)];
        // Scan: [4, 16]; margin: [2, 18]; span 16 >= 8.
        let range = infer_hour_range(&sessions, &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 2, end_hour: 18 });
    }

    #[test]
    fn test_margin_clamps_to_clock() {
        let sessions = vec![scheduled_at(0, 30, 30), scheduled_at(12, 0, 600)];
        // Scan: [0, 22]; margin clamps to [0, 23].
        let range = infer_hour_range(&sessions, &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 0, end_hour: 23 });
    }

    #[test]
    fn test_duration_rounds_up_to_whole_hours() {
        let sessions = vec![scheduled_at(9, 0, 61), scheduled_at(16, 0, 30)];
        // 61 min rounds to 2 h: scan [9, 17]; margin [7, 19]; span 12.
        let range = infer_hour_range(&sessions, &[], &Utc);
        assert_eq!(range, HourRange { start_hour: 7, end_hour: 19 });
    }

    #[test]
    fn test_completed_sessions_count_too() {
        let range = infer_hour_range(&[], &[completed_at(5, 60), completed_at(19, 60)], &Utc);
        // Scan: [5, 20]; margin: [3, 22].
        assert_eq!(range, HourRange { start_hour: 3, end_hour: 22 });
    }

    #[test]
    fn test_hours_iterator_covers_both_ends() {
        let range = HourRange { start_hour: 6, end_hour: 9 };
        let hours: Vec<_> = range.hours().collect();
        assert_eq!(hours, vec![6, 7, 8, 9]);
    }
}
