//! End-to-end runs through the public API

use apple_knight::level::LevelSet;
use apple_knight::persistence::{MemoryStore, Persistence};
use apple_knight::platform::{FixedTimestep, Simulation};
use apple_knight::sim::{GameEvent, GameState, LevelPhase, TickInput, tick};
use apple_knight::{Game, Tuning};
use glam::Vec2;

const THREE_APPLES: &str = r#"{ "levels": [
    { "platforms": [{ "position": { "x": 0, "y": 500 }, "size": { "width": 1600, "height": 100 } }],
      "collectibles": [
          { "position": { "x": 300, "y": 448 } },
          { "position": { "x": 500, "y": 448 } },
          { "position": { "x": 700, "y": 448 } }
      ],
      "requiredCollectibles": 3,
      "startPosition": { "x": 100, "y": 300 } },
    { "platforms": [{ "position": { "x": 0, "y": 500 }, "size": { "width": 1600, "height": 100 } }],
      "collectibles": [{ "position": { "x": 1500, "y": 100 } }],
      "startPosition": { "x": 40, "y": 120 } }
] }"#;

const PATROL: &str = r#"{ "levels": [
    { "platforms": [{ "position": { "x": 0, "y": 500 }, "size": { "width": 1600, "height": 100 } }],
      "collectibles": [
          { "position": { "x": 635, "y": 448 } },
          { "position": { "x": 1500, "y": 100 } }
      ],
      "requiredCollectibles": 2,
      "hazards": [{ "position": { "x": 400, "y": 500 }, "speed": 2, "moveDistance": 300 }],
      "startPosition": { "x": 600, "y": 300 } }
] }"#;

fn levels(json: &str) -> LevelSet {
    LevelSet::from_json(json, &Tuning::default()).unwrap()
}

const WALK_RIGHT: TickInput = TickInput {
    move_left: false,
    move_right: true,
    jump_requested: false,
};

#[test]
fn collecting_required_apples_moves_to_next_level() {
    let mut game = Game::new(levels(THREE_APPLES), Tuning::default(), MemoryStore::new());
    game.take_events();

    let mut steps = 0;
    while game.state.level.index == 0 && steps < 500 {
        game.input.key_down("d");
        game.step();
        steps += 1;
    }

    let state = &game.state;
    assert_eq!(state.level.index, 1);
    assert_eq!(state.player.body.pos, Vec2::new(40.0, 120.0));
    assert_eq!(state.camera_x, 0.0);
    assert_eq!(state.progress.score, 30);

    let events = game.take_events();
    let collected = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Collected { .. }))
        .count();
    assert_eq!(collected, 3);
    assert!(events.contains(&GameEvent::LevelCompleted {
        index: 0,
        collected: 3,
        total: 3
    }));

    let mut persistence = Persistence::new(game.persistence().store().clone());
    let saved = persistence.load().unwrap();
    assert_eq!(saved.level_index, 1);
    assert_eq!(saved.score, 30);
}

#[test]
fn defeat_resets_player_and_apples_but_not_geometry() {
    let mut state = GameState::new(levels(PATROL), Tuning::default());
    state.drain_events();
    let spawn = state.level.hazards[0].body.pos;
    let platforms = state.level.platforms.clone();

    let mut defeated = false;
    let mut saw_collect = false;
    for _ in 0..400 {
        tick(&mut state, &TickInput::default());
        let events = state.drain_events();
        saw_collect |= events
            .iter()
            .any(|e| matches!(e, GameEvent::Collected { .. }));
        if events.contains(&GameEvent::PlayerDefeated) {
            defeated = true;
            break;
        }
    }

    assert!(saw_collect);
    assert!(defeated);
    assert_eq!(state.phase, LevelPhase::Active);
    assert_eq!(state.player.body.pos, Vec2::new(600.0, 300.0));
    assert_eq!(state.player.body.vel, Vec2::ZERO);
    assert!(state.level.collectibles.items.iter().all(|c| !c.collected));
    assert_eq!(state.level.platforms, platforms);
    // The hazard keeps patrolling from where it was
    assert_ne!(state.level.hazards[0].body.pos, spawn);
    assert_eq!(state.progress.score, 10);
}

#[test]
fn saved_progress_resumes_in_a_new_session() {
    let mut first = Game::new(levels(THREE_APPLES), Tuning::default(), MemoryStore::new());
    for _ in 0..500 {
        first.input.key_down("d");
        first.step();
        if first.state.level.index == 1 {
            break;
        }
    }
    let store = first.persistence().store().clone();

    let second = Game::new(levels(THREE_APPLES), Tuning::default(), store);
    assert_eq!(second.state.level.index, 1);
    assert_eq!(second.state.progress.score, 30);
    assert_eq!(second.state.progress.high_score, 30);
    assert_eq!(second.state.player.body.pos, Vec2::new(40.0, 120.0));
}

#[test]
fn resumed_session_restores_collected_apples() {
    let mut first = Game::new(levels(THREE_APPLES), Tuning::default(), MemoryStore::new());
    // Walk far enough for the first apple only
    for _ in 0..60 {
        first.input.key_down("d");
        first.step();
    }
    assert_eq!(first.state.level.collectibles.collected_count(), 1);
    assert!(first.checkpoint());

    let second = Game::new(
        levels(THREE_APPLES),
        Tuning::default(),
        first.persistence().store().clone(),
    );
    assert_eq!(second.state.level.index, 0);
    assert_eq!(second.state.level.collectibles.collected_count(), 1);
    assert!(second.state.level.collectibles.items[0].collected);
}

/// Counts draws around a game
struct Driven {
    game: Game<MemoryStore>,
    draws: u32,
}

impl Simulation for Driven {
    fn step(&mut self) {
        self.game.step();
    }

    fn draw(&mut self) {
        self.draws += 1;
    }
}

#[test]
fn scheduler_steps_game_once_per_elapsed_step() {
    let mut driven = Driven {
        game: Game::new(levels(PATROL), Tuning::default(), MemoryStore::new()),
        draws: 0,
    };
    let mut scheduler = FixedTimestep::with_limits(10.0, 8, 250.0);

    let mut total = 0;
    for frame in 0..=50 {
        total += scheduler.frame(frame as f64 * 10.0, &mut driven);
    }
    assert_eq!(total, 50);
    assert_eq!(driven.draws, 51);
    assert_eq!(driven.game.state.time_ticks, 50);

    // A paused game is still drawn but does not advance
    scheduler.pause();
    scheduler.frame(600.0, &mut driven);
    assert_eq!(driven.game.state.time_ticks, 50);
    assert_eq!(driven.draws, 52);
}

#[test]
fn walking_into_the_right_edge_stops_there() {
    let mut state = GameState::new(levels(PATROL), Tuning::default());
    state.player.body.pos = Vec2::new(1400.0, 426.0);
    for _ in 0..200 {
        tick(&mut state, &WALK_RIGHT);
    }
    assert_eq!(state.player.body.pos.x, 1600.0 - 100.0);
    assert_eq!(state.player.body.vel.x, 0.0);
}
