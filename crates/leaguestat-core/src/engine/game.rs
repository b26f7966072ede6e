//! Game-scoped event handling: phase transitions and timestamps.
//!
//! ```text
//! NotStarted -> Running -> (Intermission | Timeout) -> Running -> ... -> End
//! ```
//!
//! The table is keyed by event kind alone; events are trusted to arrive in
//! lifecycle order. Phase boundaries that take players off the floor
//! (GAME_END, INTERMISSION_START, TIMEOUT_START) force-close every open
//! shift first, so no shift straddles a boundary uncounted.

use crate::error::Result;
use crate::model::{Event, EventKind, Game, GamePhase};
use crate::store::Store;

use super::{Engine, ShiftState};

impl<S: Store> Engine<S> {
    pub(crate) fn apply_game_event(&mut self, event: &Event, game: &Game) -> Result<()> {
        match event.kind {
            EventKind::GameStart => {
                if game.start_time.is_none() {
                    self.store.set_game_start_time(game.id, event.event_time)?;
                }
                self.store.set_game_phase(game.id, GamePhase::Running)?;
            }
            EventKind::IntermissionEnd | EventKind::TimeoutEnd => {
                self.store.set_game_phase(game.id, GamePhase::Running)?;
            }
            EventKind::GameEnd => {
                self.close_active_shifts(event, game)?;
                if game.end_time.is_none() {
                    self.store.set_game_end_time(game.id, event.event_time)?;
                }
                self.store.set_game_phase(game.id, GamePhase::End)?;
            }
            EventKind::IntermissionStart => {
                self.close_active_shifts(event, game)?;
                self.store.set_game_phase(game.id, GamePhase::Intermission)?;
            }
            EventKind::TimeoutStart => {
                self.close_active_shifts(event, game)?;
                self.store.set_game_phase(game.id, GamePhase::Timeout)?;
            }
            // Player-scoped kinds are dispatched elsewhere.
            EventKind::PlayerStart | EventKind::PlayerEnd | EventKind::PlayerAction => {}
        }
        Ok(())
    }

    /// Close the shift of every rostered player still holding a start-time
    /// marker for this game, at the triggering event's time.
    ///
    /// Shifts are closed sequentially; a store failure aborts the walk and
    /// shifts already closed stay closed.
    fn close_active_shifts(&mut self, event: &Event, game: &Game) -> Result<()> {
        let handles = self.well_known_types(event.league_id)?;
        let mut players = self.store.players_by_team(game.home_team_id)?;
        players.extend(self.store.players_by_team(game.visitor_team_id)?);
        for player in players {
            if let ShiftState::Active { .. } = self.shift_state(handles, player.id, game.id)? {
                tracing::debug!(
                    player_id = player.id,
                    game_id = game.id,
                    kind = ?event.kind,
                    "closing shift at phase boundary"
                );
                self.end_shift(player.id, event)?;
            }
        }
        Ok(())
    }
}
