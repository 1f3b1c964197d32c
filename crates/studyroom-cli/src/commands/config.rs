use clap::Subcommand;
use studyroom_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as JSON
    Show,
    /// Set the focus countdown length in minutes
    SetFocus {
        minutes: u64,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::SetFocus { minutes } => {
            if minutes == 0 {
                return Err("focus length must be at least one minute".into());
            }
            let mut config = Config::load()?;
            config.timer.focus_duration_min = minutes;
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
