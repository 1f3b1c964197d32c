use clap::{Subcommand, ValueEnum};
use studyroom_core::calendar::{day_range, month_range, week_range};
use studyroom_core::storage::Database;

use super::{parse_date, parse_instant};

#[derive(Clone, Copy, ValueEnum)]
pub enum Period {
    Day,
    Week,
    Month,
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Plan a study session
    Add {
        /// Topic to study
        #[arg(long)]
        topic: i64,
        /// When the session starts: RFC 3339 or local YYYY-MM-DDTHH:MM
        #[arg(long)]
        at: String,
        /// Planned length in minutes
        #[arg(long, default_value = "25")]
        minutes: u64,
        /// Free-form note
        #[arg(long)]
        notes: Option<String>,
    },
    /// List planned sessions in a window
    List {
        /// Window around --date
        #[arg(long, value_enum, default_value = "week")]
        period: Period,
        /// Anchor date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a planned session as done
    Complete {
        id: i64,
    },
    /// Remove a planned session
    Remove {
        id: i64,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ScheduleAction::Add {
            topic,
            at,
            minutes,
            notes,
        } => {
            let at = parse_instant(&at)?;
            let id = db.add_scheduled(topic, at, minutes, notes.as_deref())?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        ScheduleAction::List { period, date } => {
            let anchor = parse_date(date.as_deref())?;
            let window = match period {
                Period::Day => day_range(&anchor),
                Period::Week => week_range(&anchor),
                Period::Month => month_range(&anchor),
            };
            let sessions = db.fetch_scheduled(&window)?;
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
        ScheduleAction::Complete { id } => {
            db.complete_scheduled(id)?;
            println!("{}", serde_json::json!({ "id": id, "is_completed": true }));
        }
        ScheduleAction::Remove { id } => {
            db.delete_scheduled(id)?;
            println!("{}", serde_json::json!({ "id": id, "deleted": true }));
        }
    }

    Ok(())
}
