//! In-memory store, the test double for the SQLite-backed [`Database`].
//!
//! Backs every collaborator trait with plain vectors behind one mutex, and
//! carries the same seeding operations so tests and examples can build a
//! league without touching disk.
//!
//! [`Database`]: super::Database

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};

use crate::error::StoreError;
use crate::model::{Event, Game, GamePhase, League, Player, Statistic, StatisticType, Team};
use crate::store::{EventLog, GameStore, PlayerStore, StatisticStore, StatisticTypeCatalog};

#[derive(Default)]
struct Inner {
    leagues: Vec<League>,
    teams: Vec<Team>,
    players: Vec<Player>,
    games: Vec<Game>,
    statistic_types: Vec<StatisticType>,
    statistics: Vec<Statistic>,
    events: Vec<Event>,
    next_id: i64,
}

impl Inner {
    fn fresh_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory implementation of all store traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::QueryFailed("store mutex poisoned".into()))
    }

    // ── Seeding ──────────────────────────────────────────────────────

    pub fn add_league(&self, name: &str) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(league) = inner.leagues.iter().find(|l| l.name == name) {
            return Ok(league.id);
        }
        let id = inner.fresh_id();
        inner.leagues.push(League {
            id,
            name: name.to_string(),
            description: String::new(),
        });
        Ok(id)
    }

    pub fn add_team(&self, league_id: i64, name: &str) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(team) = inner
            .teams
            .iter()
            .find(|t| t.league_id == league_id && t.name == name)
        {
            return Ok(team.id);
        }
        let id = inner.fresh_id();
        inner.teams.push(Team {
            id,
            league_id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn add_player(&self, team_id: i64, name: &str) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(player) = inner
            .players
            .iter()
            .find(|p| p.team_id == team_id && p.name == name)
        {
            return Ok(player.id);
        }
        let id = inner.fresh_id();
        inner.players.push(Player {
            id,
            team_id,
            name: name.to_string(),
        });
        Ok(id)
    }

    pub fn add_game(
        &self,
        league_id: i64,
        name: &str,
        home_team_id: i64,
        visitor_team_id: i64,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(game) = inner
            .games
            .iter()
            .find(|g| g.league_id == league_id && g.name == name)
        {
            return Ok(game.id);
        }
        let id = inner.fresh_id();
        inner.games.push(Game {
            id,
            league_id,
            name: name.to_string(),
            description: String::new(),
            home_team_id,
            visitor_team_id,
            date,
            start_time: None,
            end_time: None,
            phase: GamePhase::NotStarted,
        });
        Ok(id)
    }

    pub fn add_statistic_type(&self, mut statistic_type: StatisticType) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner
            .statistic_types
            .iter()
            .find(|t| t.league_id == statistic_type.league_id && t.name == statistic_type.name)
        {
            return Ok(existing.id);
        }
        let id = inner.fresh_id();
        statistic_type.id = id;
        inner.statistic_types.push(statistic_type);
        Ok(id)
    }
}

impl GameStore for MemoryStore {
    fn game_by_id(&self, id: i64) -> Result<Option<Game>, StoreError> {
        Ok(self.lock()?.games.iter().find(|g| g.id == id).cloned())
    }

    fn set_game_phase(&self, id: i64, phase: GamePhase) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(game) = inner.games.iter_mut().find(|g| g.id == id) {
            game.phase = phase;
        }
        Ok(())
    }

    fn set_game_start_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(game) = inner.games.iter_mut().find(|g| g.id == id) {
            game.start_time = Some(time);
        }
        Ok(())
    }

    fn set_game_end_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(game) = inner.games.iter_mut().find(|g| g.id == id) {
            game.end_time = Some(time);
        }
        Ok(())
    }
}

impl PlayerStore for MemoryStore {
    fn players_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError> {
        Ok(self
            .lock()?
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect())
    }
}

impl StatisticStore for MemoryStore {
    fn statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<Option<Statistic>, StoreError> {
        Ok(self
            .lock()?
            .statistics
            .iter()
            .find(|s| {
                s.player_id == player_id
                    && s.game_id == game_id
                    && s.statistic_type_id == statistic_type_id
            })
            .cloned())
    }

    fn statistics_by_player_game(
        &self,
        player_id: i64,
        game_id: i64,
    ) -> Result<Vec<Statistic>, StoreError> {
        Ok(self
            .lock()?
            .statistics
            .iter()
            .filter(|s| s.player_id == player_id && s.game_id == game_id)
            .cloned()
            .collect())
    }

    fn create_if_absent(&self, statistic: &Statistic) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.statistics.iter().find(|s| {
            s.player_id == statistic.player_id
                && s.game_id == statistic.game_id
                && s.statistic_type_id == statistic.statistic_type_id
        }) {
            return Ok(existing.id);
        }
        let id = inner.fresh_id();
        let mut row = statistic.clone();
        row.id = id;
        inner.statistics.push(row);
        Ok(id)
    }

    fn update_number_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: i64,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(row) = inner.statistics.iter_mut().find(|s| {
            s.player_id == player_id
                && s.game_id == game_id
                && s.statistic_type_id == statistic_type_id
        }) {
            row.number_value = value;
        }
        Ok(())
    }

    fn update_float_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: f32,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if let Some(row) = inner.statistics.iter_mut().find(|s| {
            s.player_id == player_id
                && s.game_id == game_id
                && s.statistic_type_id == statistic_type_id
        }) {
            row.float_value = value;
        }
        Ok(())
    }

    fn delete_statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<(), StoreError> {
        self.lock()?.statistics.retain(|s| {
            !(s.player_id == player_id
                && s.game_id == game_id
                && s.statistic_type_id == statistic_type_id)
        });
        Ok(())
    }
}

impl StatisticTypeCatalog for MemoryStore {
    fn statistic_type_by_id(&self, id: i64) -> Result<Option<StatisticType>, StoreError> {
        Ok(self
            .lock()?
            .statistic_types
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    fn statistic_type_by_name(
        &self,
        league_id: i64,
        name: &str,
    ) -> Result<Option<StatisticType>, StoreError> {
        Ok(self
            .lock()?
            .statistic_types
            .iter()
            .find(|t| t.league_id == league_id && t.name == name)
            .cloned())
    }
}

impl EventLog for MemoryStore {
    fn append_event(&self, event: &Event) -> Result<i64, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.fresh_id();
        let mut row = event.clone();
        row.id = id;
        inner.events.push(row);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_if_absent_keeps_first_row() {
        let store = MemoryStore::new();
        let first = store
            .create_if_absent(&Statistic::new(1, 2, 3).with_number_value(7))
            .unwrap();
        let second = store
            .create_if_absent(&Statistic::new(1, 2, 3).with_number_value(99))
            .unwrap();
        assert_eq!(first, second);

        let row = store.statistic(1, 2, 3).unwrap().unwrap();
        assert_eq!(row.number_value, 7);
        assert_eq!(store.statistics_by_player_game(1, 2).unwrap().len(), 1);
    }

    #[test]
    fn seeding_is_idempotent_per_name() {
        let store = MemoryStore::new();
        let league = store.add_league("NBL").unwrap();
        assert_eq!(store.add_league("NBL").unwrap(), league);

        let team = store.add_team(league, "Hawks").unwrap();
        assert_eq!(store.add_team(league, "Hawks").unwrap(), team);
    }

    #[test]
    fn delete_removes_only_the_keyed_row() {
        let store = MemoryStore::new();
        store.create_if_absent(&Statistic::new(1, 2, 3)).unwrap();
        store.create_if_absent(&Statistic::new(1, 2, 4)).unwrap();
        store.delete_statistic(1, 2, 3).unwrap();
        assert!(store.statistic(1, 2, 3).unwrap().is_none());
        assert!(store.statistic(1, 2, 4).unwrap().is_some());
    }
}
