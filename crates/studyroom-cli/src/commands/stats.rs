use clap::Subcommand;
use studyroom_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Sessions and focus minutes for today
    Today,
    /// Sessions and focus minutes over all time
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let stats = match action {
        StatsAction::Today => db.stats_today()?,
        StatsAction::All => db.stats_all()?,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
