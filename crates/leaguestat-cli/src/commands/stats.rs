use clap::Subcommand;
use leaguestat_core::store::{StatisticStore, StatisticTypeCatalog};

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Statistics for a player in a game
    Player { player_id: i64, game_id: i64 },
    /// Statistic types defined for a league
    Types { league: String },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = common::open_database()?;
    match action {
        StatsAction::Player { player_id, game_id } => {
            let rows = db.statistics_by_player_game(player_id, game_id)?;
            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let type_name = db
                    .statistic_type_by_id(row.statistic_type_id)?
                    .map(|t| t.name)
                    .unwrap_or_default();
                out.push(serde_json::json!({
                    "type": type_name,
                    "statisticTypeId": row.statistic_type_id,
                    "numberValue": row.number_value,
                    "floatValue": row.float_value,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        StatsAction::Types { league } => {
            let league = db
                .league_by_name(&league)?
                .ok_or_else(|| format!("league '{league}' not found"))?;
            let types = db.statistic_types_by_league(league.id)?;
            println!("{}", serde_json::to_string_pretty(&types)?);
        }
    }
    Ok(())
}
