//! Player-scoped event handling: shifts and scored actions.
//!
//! A shift is the interval between a PLAYER_START and a PLAYER_END
//! (explicit, bound-triggered, or forced by a game phase boundary). While a
//! shift is open, the player holds a start-time marker statistic whose
//! number value is the shift's start expressed as seconds of day; ending
//! the shift merges the elapsed seconds into the play-time cell and deletes
//! the marker.

use crate::error::{EventError, NotFoundError, Result, StoreError};
use crate::model::{Event, Statistic};
use crate::playtime;
use crate::store::Store;

use super::{Engine, OutOfOrderPolicy, WellKnownTypes};

/// A player's activity state within one game.
///
/// Derived from the presence of the start-time marker: holding the marker
/// *is* being active. The tagged form keeps the transition logic checkable
/// without reaching into storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    Idle,
    Active { start_secs: u32 },
}

impl<S: Store> Engine<S> {
    /// Read a player's shift state for a game from the marker statistic.
    pub(crate) fn shift_state(
        &self,
        handles: WellKnownTypes,
        player_id: i64,
        game_id: i64,
    ) -> Result<ShiftState, StoreError> {
        Ok(
            match self
                .store
                .statistic(player_id, game_id, handles.start_time_id)?
            {
                Some(marker) => ShiftState::Active {
                    start_secs: marker.number_value as u32,
                },
                None => ShiftState::Idle,
            },
        )
    }

    /// PLAYER_START: open a shift. Idempotent -- a start while already
    /// active is a duplicate (or late retry) and leaves the original
    /// marker untouched.
    pub(crate) fn start_shift(&mut self, player_id: i64, event: &Event) -> Result<()> {
        let handles = self.well_known_types(event.league_id)?;
        match self.shift_state(handles, player_id, event.game_id)? {
            ShiftState::Active { start_secs } => {
                tracing::warn!(
                    player_id,
                    game_id = event.game_id,
                    start_secs,
                    "player already on a shift, ignoring duplicate start"
                );
                Ok(())
            }
            ShiftState::Idle => {
                self.store.create_if_absent(
                    &Statistic::new(player_id, event.game_id, handles.start_time_id)
                        .with_number_value(event.seconds_of_day() as i64),
                )?;
                Ok(())
            }
        }
    }

    /// PLAYER_END: close the shift, folding its duration into play time.
    /// Ending while idle is a no-op diagnostic, not an error.
    pub(crate) fn end_shift(&mut self, player_id: i64, event: &Event) -> Result<()> {
        let handles = self.well_known_types(event.league_id)?;
        let start_secs = match self.shift_state(handles, player_id, event.game_id)? {
            ShiftState::Idle => {
                tracing::warn!(
                    player_id,
                    game_id = event.game_id,
                    "player is not on a shift, nothing to end"
                );
                return Ok(());
            }
            ShiftState::Active { start_secs } => start_secs,
        };

        let end_secs = event.seconds_of_day();
        let elapsed = if end_secs >= start_secs {
            i64::from(end_secs - start_secs)
        } else {
            match self.config.out_of_order {
                OutOfOrderPolicy::Reject => {
                    return Err(EventError::ShiftEndBeforeStart {
                        player_id,
                        game_id: event.game_id,
                        start_secs,
                        end_secs,
                    }
                    .into())
                }
                OutOfOrderPolicy::ClampToZero => {
                    tracing::warn!(
                        player_id,
                        game_id = event.game_id,
                        start_secs,
                        end_secs,
                        "shift end precedes start, clamping duration to zero"
                    );
                    0
                }
            }
        };

        match self
            .store
            .statistic(player_id, event.game_id, handles.play_time_id)?
        {
            None => {
                self.store.create_if_absent(
                    &Statistic::new(player_id, event.game_id, handles.play_time_id)
                        .with_float_value(playtime::merge(0.0, elapsed)),
                )?;
            }
            Some(row) => {
                self.store.update_float_value(
                    player_id,
                    event.game_id,
                    handles.play_time_id,
                    playtime::merge(row.float_value, elapsed),
                )?;
            }
        }

        // Removing the marker is what ends the shift.
        self.store
            .delete_statistic(player_id, event.game_id, handles.start_time_id)?;
        Ok(())
    }

    /// PLAYER_ACTION: bump the per-type counter. An increment that reaches
    /// a configured bound ends the player's shift as a side effect.
    pub(crate) fn apply_action(
        &mut self,
        player_id: i64,
        statistic_type_id: i64,
        event: &Event,
    ) -> Result<()> {
        match self
            .store
            .statistic(player_id, event.game_id, statistic_type_id)?
        {
            None => {
                self.store.create_if_absent(
                    &Statistic::new(player_id, event.game_id, statistic_type_id)
                        .with_number_value(1),
                )?;
                Ok(())
            }
            Some(row) => {
                let value = row.number_value + 1;
                self.store
                    .update_number_value(player_id, event.game_id, statistic_type_id, value)?;

                let statistic_type = self
                    .store
                    .statistic_type_by_id(statistic_type_id)?
                    .ok_or(NotFoundError::StatisticType(statistic_type_id))?;
                let at_max = statistic_type.max_value.is_some_and(|max| value >= max);
                let at_min = statistic_type.min_value.is_some_and(|min| value <= min);
                if at_max || at_min {
                    tracing::debug!(
                        player_id,
                        game_id = event.game_id,
                        statistic_type_id,
                        value,
                        "counter reached its bound, ending shift"
                    );
                    self.end_shift(player_id, event)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use crate::engine::fixtures::{fixture, fixture_with, Fixture};
    use crate::engine::{EngineConfig, OutOfOrderPolicy, ShiftState};
    use crate::error::{CoreError, EventError};
    use crate::model::{Event, EventKind};
    use crate::playtime;
    use crate::store::StatisticStore;

    fn player_event(fx: &Fixture, kind: EventKind, time: &str) -> Event {
        Event {
            id: 0,
            league_id: fx.league,
            game_id: fx.game,
            player_id: Some(fx.home_player),
            statistic_type_id: None,
            kind,
            event_time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        }
    }

    fn shift_state(fx: &mut Fixture) -> ShiftState {
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        fx.engine
            .shift_state(handles, fx.home_player, fx.game)
            .unwrap()
    }

    #[test]
    fn start_creates_marker_with_seconds_of_day() {
        let mut fx = fixture();
        let event = player_event(&fx, EventKind::PlayerStart, "10:00:00");
        fx.engine.start_shift(fx.home_player, &event).unwrap();
        assert_eq!(
            shift_state(&mut fx),
            ShiftState::Active {
                start_secs: 10 * 3600
            }
        );
    }

    #[test]
    fn duplicate_start_is_idempotent() {
        let mut fx = fixture();
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:00:00"),
            )
            .unwrap();
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:03:00"),
            )
            .unwrap();

        // Exactly one marker, still carrying the first start time.
        assert_eq!(
            shift_state(&mut fx),
            ShiftState::Active {
                start_secs: 10 * 3600
            }
        );
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        let rows = fx
            .engine
            .store()
            .statistics_by_player_game(fx.home_player, fx.game)
            .unwrap();
        let markers = rows
            .iter()
            .filter(|s| s.statistic_type_id == handles.start_time_id)
            .count();
        assert_eq!(markers, 1);
    }

    #[test]
    fn end_without_start_is_a_noop() {
        let mut fx = fixture();
        fx.engine
            .end_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerEnd, "10:05:00"),
            )
            .unwrap();
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        assert!(fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, handles.play_time_id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn five_minute_shift_yields_five_minutes_play_time() {
        let mut fx = fixture();
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:00:00"),
            )
            .unwrap();
        fx.engine
            .end_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerEnd, "10:05:00"),
            )
            .unwrap();

        assert_eq!(shift_state(&mut fx), ShiftState::Idle);
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        let play_time = fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, handles.play_time_id)
            .unwrap()
            .unwrap();
        assert_eq!(playtime::decompose(play_time.float_value), (5, 0));
    }

    #[test]
    fn second_shift_accumulates_into_play_time() {
        let mut fx = fixture();
        for (start, end) in [("10:00:00", "10:01:30"), ("10:10:00", "10:10:45")] {
            fx.engine
                .start_shift(
                    fx.home_player,
                    &player_event(&fx, EventKind::PlayerStart, start),
                )
                .unwrap();
            fx.engine
                .end_shift(fx.home_player, &player_event(&fx, EventKind::PlayerEnd, end))
                .unwrap();
        }
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        let play_time = fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, handles.play_time_id)
            .unwrap()
            .unwrap();
        // 90s + 45s = 2:15.
        assert_eq!(playtime::decompose(play_time.float_value), (2, 15));
    }

    #[test]
    fn reversed_shift_is_rejected_by_default() {
        let mut fx = fixture();
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:05:00"),
            )
            .unwrap();
        let err = fx
            .engine
            .end_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerEnd, "10:00:00"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Event(EventError::ShiftEndBeforeStart { .. })
        ));
        // The rejected end left the shift open.
        assert!(matches!(shift_state(&mut fx), ShiftState::Active { .. }));
    }

    #[test]
    fn reversed_shift_clamps_to_zero_under_policy() {
        let mut fx = fixture_with(EngineConfig {
            out_of_order: OutOfOrderPolicy::ClampToZero,
        });
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:05:00"),
            )
            .unwrap();
        fx.engine
            .end_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerEnd, "10:00:00"),
            )
            .unwrap();

        assert_eq!(shift_state(&mut fx), ShiftState::Idle);
        let handles = fx.engine.well_known_types(fx.league).unwrap();
        let play_time = fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, handles.play_time_id)
            .unwrap()
            .unwrap();
        assert_eq!(playtime::decompose(play_time.float_value), (0, 0));
    }

    #[test]
    fn first_action_creates_counter_at_one() {
        let mut fx = fixture();
        let mut event = player_event(&fx, EventKind::PlayerAction, "10:02:00");
        event.statistic_type_id = Some(fx.fouls_type);
        fx.engine
            .apply_action(fx.home_player, fx.fouls_type, &event)
            .unwrap();
        let row = fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, fx.fouls_type)
            .unwrap()
            .unwrap();
        assert_eq!(row.number_value, 1);
    }

    #[test]
    fn fifth_foul_ends_the_shift() {
        let mut fx = fixture();
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:00:00"),
            )
            .unwrap();

        for minute in 1..=5 {
            let mut event = player_event(
                &fx,
                EventKind::PlayerAction,
                &format!("10:0{minute}:00"),
            );
            event.statistic_type_id = Some(fx.fouls_type);
            fx.engine
                .apply_action(fx.home_player, fx.fouls_type, &event)
                .unwrap();
            if minute < 5 {
                assert!(matches!(shift_state(&mut fx), ShiftState::Active { .. }));
            }
        }

        // The bound-crossing action removed the marker.
        assert_eq!(shift_state(&mut fx), ShiftState::Idle);
        let row = fx
            .engine
            .store()
            .statistic(fx.home_player, fx.game, fx.fouls_type)
            .unwrap()
            .unwrap();
        assert_eq!(row.number_value, 5);
    }

    #[test]
    fn min_bound_also_ends_the_shift() {
        let mut fx = fixture();
        // A floor of 2: the second increment reaches it from above.
        let low_type = {
            use crate::model::{StatValueKind, StatisticType};
            fx.engine
                .store()
                .add_statistic_type(StatisticType {
                    id: 0,
                    league_id: fx.league,
                    name: "warnings".to_string(),
                    description: String::new(),
                    kind: StatValueKind::Number,
                    min_value: Some(2),
                    max_value: None,
                })
                .unwrap()
        };
        fx.engine
            .start_shift(
                fx.home_player,
                &player_event(&fx, EventKind::PlayerStart, "10:00:00"),
            )
            .unwrap();

        let mut event = player_event(&fx, EventKind::PlayerAction, "10:01:00");
        event.statistic_type_id = Some(low_type);
        fx.engine
            .apply_action(fx.home_player, low_type, &event)
            .unwrap();
        // First action creates at 1 without a bound check.
        assert!(matches!(shift_state(&mut fx), ShiftState::Active { .. }));

        let mut event = player_event(&fx, EventKind::PlayerAction, "10:02:00");
        event.statistic_type_id = Some(low_type);
        fx.engine
            .apply_action(fx.home_player, low_type, &event)
            .unwrap();
        assert_eq!(shift_state(&mut fx), ShiftState::Idle);
    }
}
