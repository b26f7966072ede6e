mod event;
mod game;
mod league;
mod statistic;

pub use event::{Event, EventKind};
pub use game::{Game, GamePhase};
pub use league::{League, Player, Team};
pub use statistic::{StatValueKind, Statistic, StatisticType};
