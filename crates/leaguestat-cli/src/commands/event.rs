use std::io::Read;

use clap::Subcommand;
use leaguestat_core::Event;

use crate::common;

#[derive(Subcommand)]
pub enum EventAction {
    /// Submit one event as JSON (pass `-` to read from stdin)
    Submit { json: String },
    /// Show the applied events of a game
    Log { game_id: i64 },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EventAction::Submit { json } => {
            let raw = if json == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                json
            };
            let event: Event = serde_json::from_str(&raw)?;
            let mut engine = common::open_engine()?;
            let id = engine.submit(event)?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        EventAction::Log { game_id } => {
            let db = common::open_database()?;
            let events = db.events_by_game(game_id)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}
