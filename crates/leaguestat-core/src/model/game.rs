use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Game lifecycle phase.
///
/// ```text
/// NotStarted -> Running -> (Intermission | Timeout) -> Running -> ... -> End
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    Running,
    Intermission,
    Timeout,
    End,
}

impl GamePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::NotStarted => "NotStarted",
            GamePhase::Running => "Running",
            GamePhase::Intermission => "Intermission",
            GamePhase::Timeout => "Timeout",
            GamePhase::End => "End",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NotStarted" => Some(GamePhase::NotStarted),
            "Running" => Some(GamePhase::Running),
            "Intermission" => Some(GamePhase::Intermission),
            "Timeout" => Some(GamePhase::Timeout),
            "End" => Some(GamePhase::End),
            _ => None,
        }
    }
}

/// A scheduled contest between two teams. `name` is unique per league;
/// `start_time` and `end_time` are each written exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub home_team_id: i64,
    pub visitor_team_id: i64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    pub phase: GamePhase,
}
