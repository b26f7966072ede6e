//! # Leaguestat Core Library
//!
//! Core business logic for Leaguestat, a statistics service for sporting
//! contests. Discrete, timestamped lifecycle events (game phase changes,
//! player shifts, scored actions) are interpreted into consistent per-player
//! and per-game aggregate statistics. The CLI binary is a thin layer over
//! this library.
//!
//! ## Architecture
//!
//! - **Engine**: a request-driven interpreter -- one event in, a bounded
//!   sequence of synchronous store calls, one outcome out; no internal
//!   tasks or timers
//! - **Storage**: narrow collaborator traits with a SQLite implementation
//!   and an in-memory fake for tests
//! - **Play time**: the minutes.seconds encoded-duration arithmetic shared
//!   by shift accounting
//!
//! ## Key Components
//!
//! - [`Engine`]: event validation, dispatch, and aggregation
//! - [`Database`]: SQLite-backed store
//! - [`MemoryStore`]: in-memory store for tests
//! - [`Config`]: application configuration management

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod playtime;
pub mod store;

pub use config::Config;
pub use engine::{Engine, EngineConfig, OutOfOrderPolicy, ShiftState};
pub use error::{ConfigError, CoreError, EventError, NotFoundError, StoreError};
pub use model::{
    Event, EventKind, Game, GamePhase, League, Player, StatValueKind, Statistic, StatisticType,
    Team,
};
pub use store::{Database, MemoryStore};
