//! Day, week and month windows for calendar queries.
//!
//! Windows run from local midnight on the first day to 23:59:59.999 on
//! the last. Weeks start on Monday. Day arithmetic happens on
//! [`NaiveDate`] so a DST transition can never shift a window by an
//! hour; the boundary instants are resolved back into the zone with an
//! explicit rule for ambiguous and skipped local times.

use chrono::{DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc};

/// An inclusive time window over one or more whole calendar days.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> ScheduledWindow<Tz> {
    /// Whether `instant` falls inside the window, boundaries included.
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        let start = self.start.with_timezone(&Utc);
        let end = self.end.with_timezone(&Utc);
        *instant >= start && *instant <= end
    }
}

/// The single calendar day containing `date`.
pub fn day_range<Tz: TimeZone>(date: &DateTime<Tz>) -> ScheduledWindow<Tz> {
    let day = date.date_naive();
    window_over(&date.timezone(), day, day)
}

/// The Monday-through-Sunday week containing `date`.
pub fn week_range<Tz: TimeZone>(date: &DateTime<Tz>) -> ScheduledWindow<Tz> {
    let day = date.date_naive();
    let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    window_over(&date.timezone(), monday, monday + Duration::days(6))
}

/// The calendar month containing `date`.
pub fn month_range<Tz: TimeZone>(date: &DateTime<Tz>) -> ScheduledWindow<Tz> {
    let day = date.date_naive();
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    window_over(&date.timezone(), first, last)
}

fn window_over<Tz: TimeZone>(tz: &Tz, first: NaiveDate, last: NaiveDate) -> ScheduledWindow<Tz> {
    let start = resolve_local(tz, first.and_time(NaiveTime::MIN));
    let after = last.succ_opt().unwrap_or(last);
    let end = resolve_local(tz, after.and_time(NaiveTime::MIN)) - Duration::milliseconds(1);
    ScheduledWindow { start, end }
}

/// Map a naive local time into `tz`.
///
/// Ambiguous times (clocks rolled back) take the earlier mapping.
/// Skipped times (clocks jumped forward) scan ahead minute by minute
/// to the first representable instant.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: chrono::NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut probe = naive;
            for _ in 0..240 {
                probe += Duration::minutes(1);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => {
                        return instant;
                    }
                    LocalResult::None => {}
                }
            }
            tz.from_utc_datetime(&naive)
        }
    }
}
