use clap::Subcommand;
use leaguestat_core::store::GameStore;

use crate::common;

#[derive(Subcommand)]
pub enum GameAction {
    /// Show one game
    Show { id: i64 },
    /// List a league's games
    List { league: String },
}

pub fn run(action: GameAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = common::open_database()?;
    match action {
        GameAction::Show { id } => {
            let game = db
                .game_by_id(id)?
                .ok_or_else(|| format!("game {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&game)?);
        }
        GameAction::List { league } => {
            let league = db
                .league_by_name(&league)?
                .ok_or_else(|| format!("league '{league}' not found"))?;
            let games = db.games_by_league(league.id)?;
            println!("{}", serde_json::to_string_pretty(&games)?);
        }
    }
    Ok(())
}
