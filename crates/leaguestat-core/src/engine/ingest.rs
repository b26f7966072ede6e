//! Event intake: validation, classification, dispatch.
//!
//! One call, one event, one outcome. Rejections (unknown game, missing
//! fields) happen before any mutation; a store failure aborts processing
//! without undoing side effects already applied. Successfully applied
//! events are appended to the event log, which assigns their id.

use crate::error::{EventError, NotFoundError, Result};
use crate::model::{Event, EventKind, Statistic};
use crate::store::Store;

use super::Engine;

impl<S: Store> Engine<S> {
    /// Apply one event and return its assigned id.
    pub fn submit(&mut self, event: Event) -> Result<i64> {
        let game = self
            .store
            .game_by_id(event.game_id)?
            .ok_or(NotFoundError::Game(event.game_id))?;

        tracing::debug!(
            game_id = game.id,
            kind = ?event.kind,
            time = %event.event_time,
            "applying event"
        );

        if event.kind.is_game_scoped() {
            self.apply_game_event(&event, &game)?;
        } else {
            self.apply_player_event(&event)?;
        }

        let id = self.store.append_event(&event)?;
        Ok(id)
    }

    fn apply_player_event(&mut self, event: &Event) -> Result<()> {
        debug_assert!(event.kind.is_player_scoped());
        let player_id = event
            .player_id
            .ok_or(EventError::MissingPlayerId(event.kind))?;
        match event.kind {
            EventKind::PlayerStart => self.start_shift(player_id, event),
            EventKind::PlayerEnd => self.end_shift(player_id, event),
            _ => {
                let statistic_type_id = event
                    .statistic_type_id
                    .ok_or(EventError::MissingStatisticTypeId)?;
                self.apply_action(player_id, statistic_type_id, event)?;
                // Canonical evidence that this action type occurred in the
                // game, independent of the counter path above.
                self.store.create_if_absent(&Statistic::new(
                    player_id,
                    event.game_id,
                    statistic_type_id,
                ))?;
                Ok(())
            }
        }
    }
}
