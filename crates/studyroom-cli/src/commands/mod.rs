pub mod calendar;
pub mod config;
pub mod schedule;
pub mod stats;
pub mod timer;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Parse a `--date YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(date: Option<&str>) -> Result<DateTime<Local>, Box<dyn std::error::Error>> {
    match date {
        None => Ok(Local::now()),
        Some(raw) => {
            let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| format!("invalid date '{raw}': {e}"))?;
            let naive = day
                .and_hms_opt(12, 0, 0)
                .ok_or_else(|| format!("invalid date '{raw}'"))?;
            match Local.from_local_datetime(&naive) {
                chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => Ok(dt),
                chrono::LocalResult::None => Err(format!("invalid local date '{raw}'").into()),
            }
        }
    }
}

/// Parse a `--at` instant: RFC 3339, or local `YYYY-MM-DDTHH:MM`.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("invalid instant '{raw}': {e}"))?;
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => {
            Ok(dt.with_timezone(&Utc))
        }
        chrono::LocalResult::None => Err(format!("invalid local time '{raw}'").into()),
    }
}
