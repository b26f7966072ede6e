//! Event interpretation and statistics-aggregation engine.
//!
//! The engine is request-driven: one event in through [`Engine::submit`], a
//! bounded sequence of synchronous store calls, one outcome out. It has no
//! internal tasks or timers -- time advances only via incoming events.
//! `submit` takes `&mut self`, which serializes all store access for a
//! given engine instance; callers sharing a store across engine instances
//! must serialize per (player, game, statistic type) key themselves, since
//! the create-if-absent-then-update sequences here are not atomic across
//! store calls.
//!
//! Events for the same (player, game) pair must arrive in non-decreasing
//! event-time order. The aggregation math is not commutative; out-of-order
//! application is detected only where it would produce a negative shift
//! duration, and what happens then is governed by [`OutOfOrderPolicy`].

mod activity;
mod game;
mod ingest;
mod wellknown;

pub use activity::ShiftState;
pub use wellknown::{WellKnownTypes, PLAY_TIME, START_TIME};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::store::Store;

/// How to treat a shift end whose event time precedes the shift start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfOrderPolicy {
    /// Reject the event.
    #[default]
    Reject,
    /// Apply it as a zero-second shift and log a diagnostic.
    ClampToZero,
}

/// Engine policy knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub out_of_order: OutOfOrderPolicy,
}

/// The event engine over some store implementation.
pub struct Engine<S> {
    store: S,
    config: EngineConfig,
    /// Well-known statistic-type handles, resolved once per league.
    well_known: HashMap<i64, WellKnownTypes>,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            well_known: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
