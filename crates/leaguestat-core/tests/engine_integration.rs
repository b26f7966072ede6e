//! End-to-end engine scenarios over both store implementations.
//!
//! Events flow through `Engine::submit` exactly as the boundary would
//! deliver them; assertions read back through the store traits.

use chrono::{NaiveDate, NaiveTime};
use leaguestat_core::engine::{PLAY_TIME, START_TIME};
use leaguestat_core::store::{GameStore, StatisticStore, StatisticTypeCatalog, Store};
use leaguestat_core::{
    Database, Engine, EngineConfig, Event, EventKind, GamePhase, MemoryStore, OutOfOrderPolicy,
    StatValueKind, StatisticType,
};

struct Ids {
    league: i64,
    game: i64,
    home_player: i64,
    visitor_player: i64,
    fouls_type: i64,
}

fn seed_memory(store: &MemoryStore) -> Ids {
    let league = store.add_league("NBL").unwrap();
    let home = store.add_team(league, "Hawks").unwrap();
    let visitor = store.add_team(league, "Owls").unwrap();
    let home_player = store.add_player(home, "Ada").unwrap();
    let visitor_player = store.add_player(visitor, "Grace").unwrap();
    let game = store
        .add_game(
            league,
            "Hawks vs Owls",
            home,
            visitor,
            NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        )
        .unwrap();
    for st in well_known_types(league) {
        store.add_statistic_type(st).unwrap();
    }
    let fouls_type = store.add_statistic_type(fouls(league)).unwrap();
    Ids {
        league,
        game,
        home_player,
        visitor_player,
        fouls_type,
    }
}

fn seed_database(db: &Database) -> Ids {
    let league = db.create_league("NBL").unwrap();
    let home = db.create_team(league, "Hawks").unwrap();
    let visitor = db.create_team(league, "Owls").unwrap();
    let home_player = db.create_player(home, "Ada").unwrap();
    let visitor_player = db.create_player(visitor, "Grace").unwrap();
    let game = db
        .create_game(
            league,
            "Hawks vs Owls",
            home,
            visitor,
            NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        )
        .unwrap();
    for st in well_known_types(league) {
        db.create_statistic_type(&st).unwrap();
    }
    let fouls_type = db.create_statistic_type(&fouls(league)).unwrap();
    Ids {
        league,
        game,
        home_player,
        visitor_player,
        fouls_type,
    }
}

fn well_known_types(league_id: i64) -> Vec<StatisticType> {
    vec![
        StatisticType {
            id: 0,
            league_id,
            name: START_TIME.to_string(),
            description: String::new(),
            kind: StatValueKind::Number,
            min_value: None,
            max_value: None,
        },
        StatisticType {
            id: 0,
            league_id,
            name: PLAY_TIME.to_string(),
            description: String::new(),
            kind: StatValueKind::Float,
            min_value: None,
            max_value: None,
        },
    ]
}

fn fouls(league_id: i64) -> StatisticType {
    StatisticType {
        id: 0,
        league_id,
        name: "personalFouls".to_string(),
        description: String::new(),
        kind: StatValueKind::Number,
        min_value: None,
        max_value: Some(5),
    }
}

fn event(ids: &Ids, kind: EventKind, t: &str) -> Event {
    Event {
        id: 0,
        league_id: ids.league,
        game_id: ids.game,
        player_id: None,
        statistic_type_id: None,
        kind,
        event_time: NaiveTime::parse_from_str(t, "%H:%M:%S").unwrap(),
    }
}

fn player_event(ids: &Ids, player_id: i64, kind: EventKind, t: &str) -> Event {
    let mut e = event(ids, kind, t);
    e.player_id = Some(player_id);
    e
}

fn action(ids: &Ids, player_id: i64, t: &str) -> Event {
    let mut e = player_event(ids, player_id, EventKind::PlayerAction, t);
    e.statistic_type_id = Some(ids.fouls_type);
    e
}

/// Drive a full game through the engine and check the derived aggregates.
fn run_full_game<S: Store>(mut engine: Engine<S>, ids: Ids) {
    // First period: both players take the floor at tip-off.
    engine
        .submit(event(&ids, EventKind::GameStart, "19:00:00"))
        .unwrap();
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerStart,
            "19:00:00",
        ))
        .unwrap();
    engine
        .submit(player_event(
            &ids,
            ids.visitor_player,
            EventKind::PlayerStart,
            "19:02:00",
        ))
        .unwrap();

    // A timeout interrupts both shifts.
    engine
        .submit(event(&ids, EventKind::TimeoutStart, "19:05:00"))
        .unwrap();
    engine
        .submit(event(&ids, EventKind::TimeoutEnd, "19:06:00"))
        .unwrap();

    // Only the home player returns, picks up two fouls along the way.
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerStart,
            "19:06:00",
        ))
        .unwrap();
    engine
        .submit(action(&ids, ids.home_player, "19:07:00"))
        .unwrap();
    engine
        .submit(action(&ids, ids.home_player, "19:08:30"))
        .unwrap();

    engine
        .submit(event(&ids, EventKind::GameEnd, "19:10:00"))
        .unwrap();

    let store = engine.store();
    let game = store.game_by_id(ids.game).unwrap().unwrap();
    assert_eq!(game.phase, GamePhase::End);
    assert_eq!(
        game.start_time,
        Some(NaiveTime::parse_from_str("19:00:00", "%H:%M:%S").unwrap())
    );
    assert_eq!(
        game.end_time,
        Some(NaiveTime::parse_from_str("19:10:00", "%H:%M:%S").unwrap())
    );

    let start_type = store
        .statistic_type_by_name(ids.league, START_TIME)
        .unwrap()
        .unwrap()
        .id;
    let play_type = store
        .statistic_type_by_name(ids.league, PLAY_TIME)
        .unwrap()
        .unwrap()
        .id;

    // No marker survives game end.
    for player in [ids.home_player, ids.visitor_player] {
        assert!(store.statistic(player, ids.game, start_type).unwrap().is_none());
    }

    // Home: 5:00 before the timeout plus 4:00 after = 9.00 encoded.
    let home_play = store
        .statistic(ids.home_player, ids.game, play_type)
        .unwrap()
        .unwrap();
    assert_eq!(leaguestat_core::playtime::decompose(home_play.float_value), (9, 0));

    // Visitor: a single 3:00 shift ended by the timeout.
    let visitor_play = store
        .statistic(ids.visitor_player, ids.game, play_type)
        .unwrap()
        .unwrap();
    assert_eq!(
        leaguestat_core::playtime::decompose(visitor_play.float_value),
        (3, 0)
    );

    // Foul counter sits at 2; one row per (player, game, type) key.
    let fouls_row = store
        .statistic(ids.home_player, ids.game, ids.fouls_type)
        .unwrap()
        .unwrap();
    assert_eq!(fouls_row.number_value, 2);
    let rows = store
        .statistics_by_player_game(ids.home_player, ids.game)
        .unwrap();
    let mut keys: Vec<i64> = rows.iter().map(|s| s.statistic_type_id).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), rows.len(), "duplicate statistic key");
}

#[test]
fn full_game_over_memory_store() {
    let store = MemoryStore::new();
    let ids = seed_memory(&store);
    run_full_game(Engine::new(store), ids);
}

#[test]
fn full_game_over_sqlite() {
    let db = Database::open_memory().unwrap();
    let ids = seed_database(&db);
    run_full_game(Engine::new(db), ids);
}

#[test]
fn foul_out_ends_shift_mid_game() {
    let store = MemoryStore::new();
    let ids = seed_memory(&store);
    let mut engine = Engine::new(store);

    engine
        .submit(event(&ids, EventKind::GameStart, "19:00:00"))
        .unwrap();
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerStart,
            "19:00:00",
        ))
        .unwrap();

    for minute in 1..=5 {
        engine
            .submit(action(&ids, ids.home_player, &format!("19:0{minute}:00")))
            .unwrap();
    }

    let store = engine.store();
    let start_type = store
        .statistic_type_by_name(ids.league, START_TIME)
        .unwrap()
        .unwrap()
        .id;
    let play_type = store
        .statistic_type_by_name(ids.league, PLAY_TIME)
        .unwrap()
        .unwrap()
        .id;

    // The fifth foul closed the shift at its own event time.
    assert!(store
        .statistic(ids.home_player, ids.game, start_type)
        .unwrap()
        .is_none());
    let play = store
        .statistic(ids.home_player, ids.game, play_type)
        .unwrap()
        .unwrap();
    assert_eq!(leaguestat_core::playtime::decompose(play.float_value), (5, 0));
}

#[test]
fn reversed_shift_rejected_then_clamped() {
    // Default policy: reject.
    let store = MemoryStore::new();
    let ids = seed_memory(&store);
    let mut engine = Engine::new(store);
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerStart,
            "10:05:00",
        ))
        .unwrap();
    assert!(engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerEnd,
            "10:00:00",
        ))
        .is_err());

    // Clamp policy: accepted as a zero-length shift.
    let store = MemoryStore::new();
    let ids = seed_memory(&store);
    let mut engine = Engine::with_config(
        store,
        EngineConfig {
            out_of_order: OutOfOrderPolicy::ClampToZero,
        },
    );
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerStart,
            "10:05:00",
        ))
        .unwrap();
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerEnd,
            "10:00:00",
        ))
        .unwrap();

    let store = engine.store();
    let play_type = store
        .statistic_type_by_name(ids.league, PLAY_TIME)
        .unwrap()
        .unwrap()
        .id;
    let play = store
        .statistic(ids.home_player, ids.game, play_type)
        .unwrap()
        .unwrap();
    assert_eq!(leaguestat_core::playtime::decompose(play.float_value), (0, 0));
}

#[test]
fn sqlite_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaguestat.db");

    let ids = {
        let db = Database::open(&path).unwrap();
        let ids = seed_database(&db);
        let mut engine = Engine::new(db);
        engine
            .submit(event(&ids, EventKind::GameStart, "19:00:00"))
            .unwrap();
        engine
            .submit(player_event(
                &ids,
                ids.home_player,
                EventKind::PlayerStart,
                "19:00:00",
            ))
            .unwrap();
        ids
    };

    // A fresh connection sees the running game and the open shift, and a
    // fresh engine can close it.
    let db = Database::open(&path).unwrap();
    let game = db.game_by_id(ids.game).unwrap().unwrap();
    assert_eq!(game.phase, GamePhase::Running);

    let mut engine = Engine::new(db);
    engine
        .submit(player_event(
            &ids,
            ids.home_player,
            EventKind::PlayerEnd,
            "19:04:00",
        ))
        .unwrap();

    let store = engine.store();
    let play_type = store
        .statistic_type_by_name(ids.league, PLAY_TIME)
        .unwrap()
        .unwrap()
        .id;
    let play = store
        .statistic(ids.home_player, ids.game, play_type)
        .unwrap()
        .unwrap();
    assert_eq!(leaguestat_core::playtime::decompose(play.float_value), (4, 0));
}
