use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// The nine recognized event kinds. Anything else fails deserialization
/// at the boundary and never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    GameStart,
    GameEnd,
    TimeoutStart,
    TimeoutEnd,
    IntermissionStart,
    IntermissionEnd,
    PlayerStart,
    PlayerEnd,
    PlayerAction,
}

impl EventKind {
    /// Kinds that mutate game phase and game timestamps.
    pub fn is_game_scoped(self) -> bool {
        matches!(
            self,
            EventKind::GameStart
                | EventKind::GameEnd
                | EventKind::TimeoutStart
                | EventKind::TimeoutEnd
                | EventKind::IntermissionStart
                | EventKind::IntermissionEnd
        )
    }

    /// Kinds that require a player and mutate player statistics.
    pub fn is_player_scoped(self) -> bool {
        matches!(
            self,
            EventKind::PlayerStart | EventKind::PlayerEnd | EventKind::PlayerAction
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::GameStart => "GAME_START",
            EventKind::GameEnd => "GAME_END",
            EventKind::TimeoutStart => "TIMEOUT_START",
            EventKind::TimeoutEnd => "TIMEOUT_END",
            EventKind::IntermissionStart => "INTERMISSION_START",
            EventKind::IntermissionEnd => "INTERMISSION_END",
            EventKind::PlayerStart => "PLAYER_START",
            EventKind::PlayerEnd => "PLAYER_END",
            EventKind::PlayerAction => "PLAYER_ACTION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GAME_START" => Some(EventKind::GameStart),
            "GAME_END" => Some(EventKind::GameEnd),
            "TIMEOUT_START" => Some(EventKind::TimeoutStart),
            "TIMEOUT_END" => Some(EventKind::TimeoutEnd),
            "INTERMISSION_START" => Some(EventKind::IntermissionStart),
            "INTERMISSION_END" => Some(EventKind::IntermissionEnd),
            "PLAYER_START" => Some(EventKind::PlayerStart),
            "PLAYER_END" => Some(EventKind::PlayerEnd),
            "PLAYER_ACTION" => Some(EventKind::PlayerAction),
            _ => None,
        }
    }
}

/// A single ingested lifecycle event. Immutable once applied; `id` stays
/// zero until the event log assigns one on append.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub league_id: i64,
    pub game_id: i64,
    /// Present only for player-scoped kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    /// Present only for PLAYER_ACTION.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic_type_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Wall time of day, second resolution (`HH:MM:SS` on the wire).
    pub event_time: NaiveTime,
}

impl Event {
    /// Event time expressed as seconds since midnight.
    pub fn seconds_of_day(&self) -> u32 {
        self.event_time.num_seconds_from_midnight()
    }
}
