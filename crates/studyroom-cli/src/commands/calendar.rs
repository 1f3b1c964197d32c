use std::collections::BTreeSet;

use chrono::{Local, NaiveDate, SecondsFormat};
use clap::Subcommand;
use serde::Serialize;
use studyroom_core::calendar::{
    day_range, group_by_local_date, infer_hour_range, month_range, week_range, HourRange,
    ScheduledWindow,
};
use studyroom_core::storage::Database;
use studyroom_core::{ScheduledSession, StudySession};

use super::parse_date;

#[derive(Subcommand)]
pub enum CalendarAction {
    /// One day of sessions
    Day {
        /// Anchor date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// The Monday-through-Sunday week
    Week {
        #[arg(long)]
        date: Option<String>,
    },
    /// The calendar month
    Month {
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Serialize)]
struct WindowView {
    start: String,
    end: String,
}

#[derive(Serialize)]
struct DayView {
    date: NaiveDate,
    scheduled: Vec<ScheduledSession>,
    completed: Vec<StudySession>,
    hour_range: HourRange,
}

#[derive(Serialize)]
struct CalendarView {
    window: WindowView,
    days: Vec<DayView>,
}

fn render(window: &ScheduledWindow<Local>, db: &Database) -> Result<CalendarView, Box<dyn std::error::Error>> {
    let scheduled = db.fetch_scheduled(window)?;
    let completed = db.fetch_completed(window)?;

    let mut by_day_scheduled = group_by_local_date(&scheduled, &Local, |s| s.scheduled_at);
    let mut by_day_completed = group_by_local_date(&completed, &Local, |s| s.completed_at);

    let dates: BTreeSet<NaiveDate> = by_day_scheduled
        .keys()
        .chain(by_day_completed.keys())
        .copied()
        .collect();

    let days = dates
        .into_iter()
        .map(|date| {
            let scheduled = by_day_scheduled.remove(&date).unwrap_or_default();
            let completed = by_day_completed.remove(&date).unwrap_or_default();
            let hour_range = infer_hour_range(&scheduled, &completed, &Local);
            DayView {
                date,
                scheduled,
                completed,
                hour_range,
            }
        })
        .collect();

    Ok(CalendarView {
        window: WindowView {
            start: window.start.to_rfc3339_opts(SecondsFormat::Millis, false),
            end: window.end.to_rfc3339_opts(SecondsFormat::Millis, false),
        },
        days,
    })
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    let window = match action {
        CalendarAction::Day { date } => day_range(&parse_date(date.as_deref())?),
        CalendarAction::Week { date } => week_range(&parse_date(date.as_deref())?),
        CalendarAction::Month { date } => month_range(&parse_date(date.as_deref())?),
    };

    let view = render(&window, &db)?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
