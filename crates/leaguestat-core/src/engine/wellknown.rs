//! Engine-recognized statistic types.
//!
//! `startTime` and `playTime` carry special meaning: the first is the
//! transient shift marker, the second the accumulated play-time cell. They
//! are resolved by name once per league and reduced to plain id handles so
//! the hot path never repeats a catalog lookup.

use crate::error::{NotFoundError, Result};
use crate::store::Store;

use super::Engine;

/// Name of the shift-marker statistic type.
pub const START_TIME: &str = "startTime";
/// Name of the accumulated play-time statistic type.
pub const PLAY_TIME: &str = "playTime";

/// Resolved id handles for one league's well-known statistic types.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownTypes {
    pub start_time_id: i64,
    pub play_time_id: i64,
}

impl<S: Store> Engine<S> {
    /// Resolve (or fetch cached) well-known type handles for a league.
    pub(crate) fn well_known_types(&mut self, league_id: i64) -> Result<WellKnownTypes> {
        if let Some(handles) = self.well_known.get(&league_id) {
            return Ok(*handles);
        }
        let start_time_id = self.resolve_type_id(league_id, START_TIME)?;
        let play_time_id = self.resolve_type_id(league_id, PLAY_TIME)?;
        let handles = WellKnownTypes {
            start_time_id,
            play_time_id,
        };
        self.well_known.insert(league_id, handles);
        Ok(handles)
    }

    fn resolve_type_id(&self, league_id: i64, name: &'static str) -> Result<i64> {
        self.store
            .statistic_type_by_name(league_id, name)?
            .map(|t| t.id)
            .ok_or_else(|| NotFoundError::WellKnownType { league_id, name }.into())
    }
}
