//! Collaborator interfaces and their two implementations.
//!
//! The engine only ever talks to the narrow traits in this module, so its
//! logic is independent of the concrete persistence technology: [`Database`]
//! is the SQLite-backed store, [`MemoryStore`] the in-memory fake used in
//! tests. All calls are synchronous and blocking.

pub mod database;
pub mod memory;

pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::NaiveTime;

use crate::error::StoreError;
use crate::model::{Event, Game, GamePhase, Player, Statistic, StatisticType};

/// Game lookup and the three single-row updates the state machine needs.
pub trait GameStore {
    fn game_by_id(&self, id: i64) -> Result<Option<Game>, StoreError>;
    fn set_game_phase(&self, id: i64, phase: GamePhase) -> Result<(), StoreError>;
    fn set_game_start_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError>;
    fn set_game_end_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError>;
}

/// Roster lookup, used only by the game-phase shift-closing fan-out.
pub trait PlayerStore {
    fn players_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError>;
}

/// Keyed access to statistic cells. `create_if_absent` never overwrites an
/// existing row; it returns the existing row's id instead.
pub trait StatisticStore {
    fn statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<Option<Statistic>, StoreError>;
    fn statistics_by_player_game(
        &self,
        player_id: i64,
        game_id: i64,
    ) -> Result<Vec<Statistic>, StoreError>;
    fn create_if_absent(&self, statistic: &Statistic) -> Result<i64, StoreError>;
    fn update_number_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: i64,
    ) -> Result<(), StoreError>;
    fn update_float_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: f32,
    ) -> Result<(), StoreError>;
    fn delete_statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<(), StoreError>;
}

/// Statistic-type catalog: by id, and by well-known name within a league.
pub trait StatisticTypeCatalog {
    fn statistic_type_by_id(&self, id: i64) -> Result<Option<StatisticType>, StoreError>;
    fn statistic_type_by_name(
        &self,
        league_id: i64,
        name: &str,
    ) -> Result<Option<StatisticType>, StoreError>;
}

/// Append-only log of successfully applied events. Assigns the event id.
pub trait EventLog {
    fn append_event(&self, event: &Event) -> Result<i64, StoreError>;
}

/// Everything the engine needs from a store, in one bound.
pub trait Store:
    GameStore + PlayerStore + StatisticStore + StatisticTypeCatalog + EventLog
{
}

impl<T> Store for T where
    T: GameStore + PlayerStore + StatisticStore + StatisticTypeCatalog + EventLog
{
}

/// Returns `~/.config/leaguestat[-dev]/` based on LEAGUESTAT_ENV.
///
/// Set LEAGUESTAT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LEAGUESTAT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("leaguestat-dev")
    } else {
        base_dir.join("leaguestat")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
