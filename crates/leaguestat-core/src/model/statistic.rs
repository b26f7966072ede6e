use serde::{Deserialize, Serialize};

/// Which of the two value slots a statistic type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatValueKind {
    Number,
    Float,
}

impl StatValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatValueKind::Number => "NUMBER",
            StatValueKind::Float => "FLOAT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NUMBER" => Some(StatValueKind::Number),
            "FLOAT" => Some(StatValueKind::Float),
            _ => None,
        }
    }
}

/// A league-defined (or well-known) statistic category. When `min_value`
/// or `max_value` is set, a NUMBER counter reaching the bound ends the
/// player's current shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticType {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: StatValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
}

/// One aggregate cell, keyed by (player, game, statistic type). At most one
/// row exists per key. `number_value` and `float_value` both default to
/// zero and are used disjointly depending on the type's value kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    #[serde(default)]
    pub id: i64,
    pub player_id: i64,
    pub game_id: i64,
    pub statistic_type_id: i64,
    #[serde(default)]
    pub number_value: i64,
    #[serde(default)]
    pub float_value: f32,
}

impl Statistic {
    /// A zero-valued cell for the given key.
    pub fn new(player_id: i64, game_id: i64, statistic_type_id: i64) -> Self {
        Self {
            id: 0,
            player_id,
            game_id,
            statistic_type_id,
            number_value: 0,
            float_value: 0.0,
        }
    }

    pub fn with_number_value(mut self, value: i64) -> Self {
        self.number_value = value;
        self
    }

    pub fn with_float_value(mut self, value: f32) -> Self {
        self.float_value = value;
        self
    }
}
