//! Core error types for leaguestat-core.
//!
//! Every rejection an event can receive falls into one of three groups:
//! a missing referent ([`NotFoundError`]), a malformed or inapplicable
//! event ([`EventError`]), or a collaborator I/O failure ([`StoreError`]).
//! The first two are raised before any mutation; the last aborts the
//! current event without rolling back side effects already applied.

use thiserror::Error;

use crate::model::EventKind;

/// Core error type for leaguestat-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// The event is malformed or cannot be applied
    #[error("invalid event: {0}")]
    Event(#[from] EventError),

    /// A store operation failed
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A referenced entity is absent from the store.
#[derive(Error, Debug)]
pub enum NotFoundError {
    #[error("game {0} not found")]
    Game(i64),

    #[error("statistic type {0} not found")]
    StatisticType(i64),

    /// A league is missing one of the engine-recognized statistic types.
    #[error("well-known statistic type '{name}' not defined for league {league_id}")]
    WellKnownType { league_id: i64, name: &'static str },
}

/// The event itself is unusable for its declared kind.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("event of kind {0:?} requires a playerId")]
    MissingPlayerId(EventKind),

    #[error("PLAYER_ACTION event requires a statisticTypeId")]
    MissingStatisticTypeId,

    /// Shift end precedes shift start and the engine is configured to reject.
    #[error(
        "shift end at second {end_secs} precedes shift start at second {start_secs} \
         for player {player_id} in game {game_id}"
    )]
    ShiftEndBeforeStart {
        player_id: i64,
        game_id: i64,
        start_secs: u32,
        end_secs: u32,
    },
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("store migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed {
        path: std::path::PathBuf,
        message: String,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
