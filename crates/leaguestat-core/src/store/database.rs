//! SQLite-backed store.
//!
//! One [`Database`] owns one `rusqlite::Connection`. The schema mirrors the
//! data model: reference tables (league, team, player, game,
//! statistic_type), the statistic aggregate table with its composite unique
//! index, and the append-only event log.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreError;
use crate::model::{
    Event, EventKind, Game, GamePhase, League, Player, StatValueKind, Statistic, StatisticType,
};
use crate::store::{data_dir, EventLog, GameStore, PlayerStore, StatisticStore, StatisticTypeCatalog};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database implementing all collaborator traits.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/leaguestat.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::QueryFailed(format!("data directory: {e}")))?
            .join("leaguestat.db");
        Self::open(&path)
    }

    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS league (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    name        TEXT NOT NULL UNIQUE,
                    description TEXT NOT NULL DEFAULT ''
                );

                CREATE TABLE IF NOT EXISTS team (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    league_id INTEGER NOT NULL REFERENCES league(id) ON DELETE CASCADE,
                    name      TEXT NOT NULL,
                    UNIQUE (league_id, name)
                );

                CREATE TABLE IF NOT EXISTS player (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    team_id INTEGER NOT NULL REFERENCES team(id) ON DELETE CASCADE,
                    name    TEXT NOT NULL,
                    UNIQUE (team_id, name)
                );

                CREATE TABLE IF NOT EXISTS game (
                    id              INTEGER PRIMARY KEY AUTOINCREMENT,
                    league_id       INTEGER NOT NULL REFERENCES league(id) ON DELETE CASCADE,
                    name            TEXT NOT NULL,
                    description     TEXT NOT NULL DEFAULT '',
                    home_team_id    INTEGER NOT NULL REFERENCES team(id) ON DELETE CASCADE,
                    visitor_team_id INTEGER NOT NULL REFERENCES team(id) ON DELETE CASCADE,
                    date            TEXT NOT NULL,
                    start_time      TEXT,
                    end_time        TEXT,
                    phase           TEXT NOT NULL DEFAULT 'NotStarted',
                    UNIQUE (league_id, name)
                );

                CREATE TABLE IF NOT EXISTS statistic_type (
                    id          INTEGER PRIMARY KEY AUTOINCREMENT,
                    league_id   INTEGER NOT NULL REFERENCES league(id) ON DELETE CASCADE,
                    name        TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    kind        TEXT NOT NULL,
                    min_value   INTEGER,
                    max_value   INTEGER,
                    UNIQUE (league_id, name)
                );

                CREATE TABLE IF NOT EXISTS statistic (
                    id                INTEGER PRIMARY KEY AUTOINCREMENT,
                    player_id         INTEGER NOT NULL REFERENCES player(id) ON DELETE CASCADE,
                    game_id           INTEGER NOT NULL REFERENCES game(id) ON DELETE CASCADE,
                    statistic_type_id INTEGER NOT NULL REFERENCES statistic_type(id) ON DELETE CASCADE,
                    number_value      INTEGER NOT NULL DEFAULT 0,
                    float_value       REAL NOT NULL DEFAULT 0.0
                );

                CREATE UNIQUE INDEX IF NOT EXISTS idx_statistic_composite
                    ON statistic (player_id, game_id, statistic_type_id);
                CREATE INDEX IF NOT EXISTS idx_statistic_player_game
                    ON statistic (player_id, game_id);

                CREATE TABLE IF NOT EXISTS event (
                    id                INTEGER PRIMARY KEY AUTOINCREMENT,
                    league_id         INTEGER NOT NULL,
                    game_id           INTEGER NOT NULL,
                    player_id         INTEGER,
                    statistic_type_id INTEGER,
                    kind              TEXT NOT NULL,
                    event_time        TEXT NOT NULL
                );",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }

    // ── Seeding ──────────────────────────────────────────────────────

    /// Create a league if no league with this name exists; returns its id.
    pub fn create_league(&self, name: &str) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM league WHERE name = ?1", params![name], |r| {
                r.get(0)
            })
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn
            .execute("INSERT INTO league (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_team(&self, league_id: i64, name: &str) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM team WHERE league_id = ?1 AND name = ?2",
                params![league_id, name],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO team (league_id, name) VALUES (?1, ?2)",
            params![league_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_player(&self, team_id: i64, name: &str) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM player WHERE team_id = ?1 AND name = ?2",
                params![team_id, name],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO player (team_id, name) VALUES (?1, ?2)",
            params![team_id, name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_game(
        &self,
        league_id: i64,
        name: &str,
        home_team_id: i64,
        visitor_team_id: i64,
        date: NaiveDate,
    ) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM game WHERE league_id = ?1 AND name = ?2",
                params![league_id, name],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO game (league_id, name, home_team_id, visitor_team_id, date, phase)
             VALUES (?1, ?2, ?3, ?4, ?5, 'NotStarted')",
            params![
                league_id,
                name,
                home_team_id,
                visitor_team_id,
                date.format(DATE_FORMAT).to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn create_statistic_type(&self, statistic_type: &StatisticType) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM statistic_type WHERE league_id = ?1 AND name = ?2",
                params![statistic_type.league_id, statistic_type.name],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO statistic_type (league_id, name, description, kind, min_value, max_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                statistic_type.league_id,
                statistic_type.name,
                statistic_type.description,
                statistic_type.kind.as_str(),
                statistic_type.min_value,
                statistic_type.max_value
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    // ── Queries for the CLI surface ──────────────────────────────────

    pub fn league_by_name(&self, name: &str) -> Result<Option<League>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, description FROM league WHERE name = ?1",
                params![name],
                |r| {
                    Ok(League {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        description: r.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(StoreError::from)
    }

    pub fn games_by_league(&self, league_id: i64) -> Result<Vec<Game>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, league_id, name, description, home_team_id, visitor_team_id,
                    date, start_time, end_time, phase
             FROM game WHERE league_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![league_id], game_from_row)?;
        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }

    pub fn statistic_types_by_league(&self, league_id: i64) -> Result<Vec<StatisticType>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, league_id, name, description, kind, min_value, max_value
             FROM statistic_type WHERE league_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![league_id], statistic_type_from_row)?;
        let mut types = Vec::new();
        for row in rows {
            types.push(row?);
        }
        Ok(types)
    }

    /// Applied events for one game, in application order.
    pub fn events_by_game(&self, game_id: i64) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, league_id, game_id, player_id, statistic_type_id, kind, event_time
             FROM event WHERE game_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![game_id], event_from_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }
}

fn parse_time(text: &str) -> Result<NaiveTime, rusqlite::Error> {
    NaiveTime::parse_from_str(text, TIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

fn game_from_row(row: &Row<'_>) -> Result<Game, rusqlite::Error> {
    let date: String = row.get(6)?;
    let start_time: Option<String> = row.get(7)?;
    let end_time: Option<String> = row.get(8)?;
    let phase: String = row.get(9)?;
    Ok(Game {
        id: row.get(0)?,
        league_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        home_team_id: row.get(4)?,
        visitor_team_id: row.get(5)?,
        date: parse_date(&date)?,
        start_time: start_time.as_deref().map(parse_time).transpose()?,
        end_time: end_time.as_deref().map(parse_time).transpose()?,
        phase: GamePhase::parse(&phase).unwrap_or(GamePhase::NotStarted),
    })
}

fn statistic_type_from_row(row: &Row<'_>) -> Result<StatisticType, rusqlite::Error> {
    let kind: String = row.get(4)?;
    Ok(StatisticType {
        id: row.get(0)?,
        league_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        kind: StatValueKind::parse(&kind).unwrap_or(StatValueKind::Number),
        min_value: row.get(5)?,
        max_value: row.get(6)?,
    })
}

fn event_from_row(row: &Row<'_>) -> Result<Event, rusqlite::Error> {
    let kind: String = row.get(5)?;
    let event_time: String = row.get(6)?;
    Ok(Event {
        id: row.get(0)?,
        league_id: row.get(1)?,
        game_id: row.get(2)?,
        player_id: row.get(3)?,
        statistic_type_id: row.get(4)?,
        kind: EventKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown event kind '{kind}'").into(),
            )
        })?,
        event_time: parse_time(&event_time)?,
    })
}

fn statistic_from_row(row: &Row<'_>) -> Result<Statistic, rusqlite::Error> {
    let float_value: f64 = row.get(5)?;
    Ok(Statistic {
        id: row.get(0)?,
        player_id: row.get(1)?,
        game_id: row.get(2)?,
        statistic_type_id: row.get(3)?,
        number_value: row.get(4)?,
        float_value: float_value as f32,
    })
}

impl GameStore for Database {
    fn game_by_id(&self, id: i64) -> Result<Option<Game>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, league_id, name, description, home_team_id, visitor_team_id,
                        date, start_time, end_time, phase
                 FROM game WHERE id = ?1",
                params![id],
                game_from_row,
            )
            .optional()
            .map_err(StoreError::from)
    }

    fn set_game_phase(&self, id: i64, phase: GamePhase) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE game SET phase = ?1 WHERE id = ?2",
            params![phase.as_str(), id],
        )?;
        Ok(())
    }

    fn set_game_start_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE game SET start_time = ?1 WHERE id = ?2",
            params![time.format(TIME_FORMAT).to_string(), id],
        )?;
        Ok(())
    }

    fn set_game_end_time(&self, id: i64, time: NaiveTime) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE game SET end_time = ?1 WHERE id = ?2",
            params![time.format(TIME_FORMAT).to_string(), id],
        )?;
        Ok(())
    }
}

impl PlayerStore for Database {
    fn players_by_team(&self, team_id: i64) -> Result<Vec<Player>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, team_id, name FROM player WHERE team_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![team_id], |r| {
            Ok(Player {
                id: r.get(0)?,
                team_id: r.get(1)?,
                name: r.get(2)?,
            })
        })?;
        let mut players = Vec::new();
        for row in rows {
            players.push(row?);
        }
        Ok(players)
    }
}

impl StatisticStore for Database {
    fn statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<Option<Statistic>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, player_id, game_id, statistic_type_id, number_value, float_value
                 FROM statistic
                 WHERE player_id = ?1 AND game_id = ?2 AND statistic_type_id = ?3",
                params![player_id, game_id, statistic_type_id],
                statistic_from_row,
            )
            .optional()
            .map_err(StoreError::from)
    }

    fn statistics_by_player_game(
        &self,
        player_id: i64,
        game_id: i64,
    ) -> Result<Vec<Statistic>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, player_id, game_id, statistic_type_id, number_value, float_value
             FROM statistic WHERE player_id = ?1 AND game_id = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![player_id, game_id], statistic_from_row)?;
        let mut statistics = Vec::new();
        for row in rows {
            statistics.push(row?);
        }
        Ok(statistics)
    }

    fn create_if_absent(&self, statistic: &Statistic) -> Result<i64, StoreError> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM statistic
                 WHERE player_id = ?1 AND game_id = ?2 AND statistic_type_id = ?3",
                params![
                    statistic.player_id,
                    statistic.game_id,
                    statistic.statistic_type_id
                ],
                |r| r.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO statistic (player_id, game_id, statistic_type_id, number_value, float_value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                statistic.player_id,
                statistic.game_id,
                statistic.statistic_type_id,
                statistic.number_value,
                statistic.float_value as f64
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_number_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE statistic SET number_value = ?1
             WHERE player_id = ?2 AND game_id = ?3 AND statistic_type_id = ?4",
            params![value, player_id, game_id, statistic_type_id],
        )?;
        Ok(())
    }

    fn update_float_value(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
        value: f32,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE statistic SET float_value = ?1
             WHERE player_id = ?2 AND game_id = ?3 AND statistic_type_id = ?4",
            params![value as f64, player_id, game_id, statistic_type_id],
        )?;
        Ok(())
    }

    fn delete_statistic(
        &self,
        player_id: i64,
        game_id: i64,
        statistic_type_id: i64,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM statistic
             WHERE player_id = ?1 AND game_id = ?2 AND statistic_type_id = ?3",
            params![player_id, game_id, statistic_type_id],
        )?;
        Ok(())
    }
}

impl StatisticTypeCatalog for Database {
    fn statistic_type_by_id(&self, id: i64) -> Result<Option<StatisticType>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, league_id, name, description, kind, min_value, max_value
                 FROM statistic_type WHERE id = ?1",
                params![id],
                statistic_type_from_row,
            )
            .optional()
            .map_err(StoreError::from)
    }

    fn statistic_type_by_name(
        &self,
        league_id: i64,
        name: &str,
    ) -> Result<Option<StatisticType>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, league_id, name, description, kind, min_value, max_value
                 FROM statistic_type WHERE league_id = ?1 AND name = ?2",
                params![league_id, name],
                statistic_type_from_row,
            )
            .optional()
            .map_err(StoreError::from)
    }
}

impl EventLog for Database {
    fn append_event(&self, event: &Event) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO event (league_id, game_id, player_id, statistic_type_id, kind, event_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.league_id,
                event.game_id,
                event.player_id,
                event.statistic_type_id,
                event.kind.as_str(),
                event.event_time.format(TIME_FORMAT).to_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
