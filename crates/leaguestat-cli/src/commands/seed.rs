use chrono::NaiveDate;
use clap::Subcommand;
use leaguestat_core::engine::{PLAY_TIME, START_TIME};
use leaguestat_core::{StatValueKind, StatisticType};

use crate::common;

#[derive(Subcommand)]
pub enum SeedAction {
    /// Create a league together with its well-known statistic types
    League { name: String },
    /// Create a team in a league
    Team { league: String, name: String },
    /// Create a player on a team
    Player {
        league: String,
        team: String,
        name: String,
    },
    /// Create a game between two teams
    Game {
        league: String,
        name: String,
        home: String,
        visitor: String,
        date: NaiveDate,
    },
    /// Create a league-defined statistic type
    StatType {
        league: String,
        name: String,
        /// NUMBER or FLOAT
        #[arg(long, default_value = "NUMBER")]
        kind: String,
        /// Counter floor that ends a shift when reached
        #[arg(long)]
        min: Option<i64>,
        /// Counter ceiling that ends a shift when reached
        #[arg(long)]
        max: Option<i64>,
    },
}

pub fn run(action: SeedAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = common::open_database()?;
    match action {
        SeedAction::League { name } => {
            let league_id = db.create_league(&name)?;
            db.create_statistic_type(&StatisticType {
                id: 0,
                league_id,
                name: START_TIME.to_string(),
                description: "shift start marker".to_string(),
                kind: StatValueKind::Number,
                min_value: None,
                max_value: None,
            })?;
            db.create_statistic_type(&StatisticType {
                id: 0,
                league_id,
                name: PLAY_TIME.to_string(),
                description: "accumulated play time".to_string(),
                kind: StatValueKind::Float,
                min_value: None,
                max_value: None,
            })?;
            println!("{}", serde_json::json!({ "id": league_id }));
        }
        SeedAction::Team { league, name } => {
            let league_id = db.create_league(&league)?;
            let id = db.create_team(league_id, &name)?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        SeedAction::Player { league, team, name } => {
            let league_id = db.create_league(&league)?;
            let team_id = db.create_team(league_id, &team)?;
            let id = db.create_player(team_id, &name)?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        SeedAction::Game {
            league,
            name,
            home,
            visitor,
            date,
        } => {
            let league_id = db.create_league(&league)?;
            let home_id = db.create_team(league_id, &home)?;
            let visitor_id = db.create_team(league_id, &visitor)?;
            let id = db.create_game(league_id, &name, home_id, visitor_id, date)?;
            println!("{}", serde_json::json!({ "id": id }));
        }
        SeedAction::StatType {
            league,
            name,
            kind,
            min,
            max,
        } => {
            let league_id = db.create_league(&league)?;
            let kind = StatValueKind::parse(&kind)
                .ok_or_else(|| format!("unknown value kind '{kind}' (NUMBER or FLOAT)"))?;
            let id = db.create_statistic_type(&StatisticType {
                id: 0,
                league_id,
                name,
                description: String::new(),
                kind,
                min_value: min,
                max_value: max,
            })?;
            println!("{}", serde_json::json!({ "id": id }));
        }
    }
    Ok(())
}
