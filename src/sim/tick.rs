//! Fixed timestep simulation tick
//!
//! One call advances the game by one step. The pipeline order is fixed:
//! integrate, resolve collisions, patrol, collectibles, progression. Later
//! stages read the positions corrected by earlier ones.

use super::collision::{clamp_to_bounds, move_and_collide};
use super::progression::{LevelPhase, Transition, evaluate};
use super::state::{GameEvent, GameState};

/// Input intent for a single step, filled in by any input source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_requested: bool,
}

/// Advance the game state by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != LevelPhase::Active {
        return;
    }
    state.time_ticks += 1;

    integrate(state, input);
    resolve_player(state);

    for hazard in &mut state.level.hazards {
        hazard.update(&state.level.platforms);
    }

    collect(state);
    progress(state);
}

/// Intent, jump and gravity
fn integrate(state: &mut GameState, input: &TickInput) {
    let physics = &state.tuning.physics;
    if state.player.apply_intent(input, physics) {
        state.events.push(GameEvent::Jumped);
    }
    state.player.body.apply_gravity(physics.gravity);
}

/// Move the player against the platforms and the level bounds
fn resolve_player(state: &mut GameState) {
    let player = &mut state.player;
    let contact = move_and_collide(&mut player.body, &state.level.platforms);
    player.on_ground = contact.grounded;

    if clamp_to_bounds(&mut player.body, &state.level.bounds) {
        player.on_ground = true;
    }
    if player.on_ground {
        player.jumping = false;
    }

    state.update_camera();
}

fn collect(state: &mut GameState) {
    let tracker = &mut state.level.collectibles;
    tracker.tick_fade(state.tuning.collectible.fade_steps);

    for pickup in tracker.collect_near(&state.player.rect()) {
        state.progress.score += pickup.points;
        state.events.push(GameEvent::Collected {
            position: pickup.position,
            points: pickup.points,
        });
    }
}

fn progress(state: &mut GameState) {
    let transition = evaluate(
        &state.level.collectibles,
        &state.player.rect(),
        &state.level.hazards,
    );
    match transition {
        Transition::Complete => complete_level(state),
        Transition::Defeat => defeat(state),
        Transition::None => {}
    }
}

fn complete_level(state: &mut GameState) {
    state.phase = LevelPhase::Completed;
    let index = state.level.index;
    let tracker = &state.level.collectibles;
    state.events.push(GameEvent::LevelCompleted {
        index,
        collected: tracker.collected_count(),
        total: tracker.total_count(),
    });
    state.progress.record_high_score();

    if state.has_next_level() {
        log::info!("Level {} complete, score {}", index + 1, state.progress.score);
        state.load_level(index + 1);
    } else {
        log::info!("Game complete! Final score {}", state.progress.score);
        state.phase = LevelPhase::GameComplete;
        state.events.push(GameEvent::GameComplete);
    }
}

/// Respawn in place: platforms and hazards keep their state
fn defeat(state: &mut GameState) {
    state.phase = LevelPhase::PlayerDefeated;
    log::info!("Player defeated on level {}", state.level.index + 1);

    state.player.reset_to(state.level.respawn);
    state.level.collectibles.reset_all();
    state.update_camera();
    state.events.push(GameEvent::PlayerDefeated);

    state.phase = LevelPhase::Active;
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::level::LevelSet;
    use crate::tuning::Tuning;

    fn state_from(json: &str) -> GameState {
        let tuning = Tuning::default();
        let mut state = GameState::new(LevelSet::from_json(json, &tuning).unwrap(), tuning);
        state.drain_events();
        state
    }

    const FLOOR_LEVEL: &str = r#"{ "levels": [{
        "platforms": [{ "position": { "x": 0, "y": 500 }, "width": 1600, "height": 100 }],
        "collectibles": [{ "position": { "x": 1500, "y": 100 } }],
        "startPosition": { "x": 100, "y": 300 },
        "height": 2000
    }] }"#;

    #[test]
    fn test_falls_and_lands() {
        let mut state = state_from(FLOOR_LEVEL);
        let input = TickInput::default();
        for _ in 0..200 {
            tick(&mut state, &input);
        }
        assert!(state.player.on_ground);
        assert_eq!(state.player.body.vel.y, 0.0);
        assert_eq!(state.player.body.pos.y, 500.0 - 74.0);
        assert_eq!(state.time_ticks, 200);
    }

    #[test]
    fn test_jump_emits_event_and_rises() {
        let mut state = state_from(FLOOR_LEVEL);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        let ground_y = state.player.body.pos.y;

        let jump = TickInput {
            jump_requested: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert!(state.events.contains(&GameEvent::Jumped));
        assert!(state.player.jumping);
        assert!(!state.player.on_ground);
        assert_eq!(state.player.body.vel.y, -19.5);
        assert_eq!(state.player.body.pos.y, ground_y - 19.5);
    }

    #[test]
    fn test_walks_right_and_camera_follows() {
        let mut state = state_from(FLOOR_LEVEL);
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &right);
        }
        assert_eq!(state.player.body.pos.x, 600.0);
        assert!(state.camera_x > 0.0);
    }

    #[test]
    fn test_bottom_bound_acts_as_floor() {
        let mut state = state_from(
            r#"{ "levels": [{
                "collectibles": [{ "position": { "x": 1500, "y": 0 } }],
                "startPosition": { "x": 0, "y": 0 }
            }] }"#,
        );
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.player.on_ground);
        assert_eq!(state.player.body.pos.y, 600.0 - 74.0);
    }

    #[test]
    fn test_hazards_patrol_each_step() {
        let mut state = state_from(
            r#"{ "levels": [{
                "collectibles": [{ "position": { "x": 1500, "y": 0 } }],
                "hazards": [{ "position": { "x": 800, "y": 600 } }],
                "startPosition": { "x": 0, "y": 0 }
            }] }"#,
        );
        let start = state.level.hazards[0].body.pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level.hazards[0].body.pos, start + Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_inactive_phase_does_not_step() {
        let mut state = state_from(FLOOR_LEVEL);
        state.phase = LevelPhase::GameComplete;
        let before = state.player.body.pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.body.pos, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_collecting_awards_score() {
        let mut state = state_from(
            r#"{ "levels": [{
                "collectibles": [{ "position": { "x": 135, "y": 322 } }, { "position": { "x": 900, "y": 0 } }],
                "requiredCollectibles": 2,
                "startPosition": { "x": 100, "y": 300 }
            }] }"#,
        );
        tick(&mut state, &TickInput::default());
        assert_eq!(state.progress.score, 10);
        assert_eq!(state.level.collectibles.collected_count(), 1);
        assert!(matches!(state.events[0], GameEvent::Collected { points: 10, .. }));
    }

    #[test]
    fn test_completion_loads_next_level() {
        let mut state = state_from(
            r#"{ "levels": [
                { "collectibles": [{ "position": { "x": 135, "y": 322 } }],
                  "startPosition": { "x": 100, "y": 300 } },
                { "collectibles": [{ "position": { "x": 1500, "y": 0 } }],
                  "startPosition": { "x": 40, "y": 50 } }
            ] }"#,
        );
        tick(&mut state, &TickInput::default());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelCompleted {
            index: 0,
            collected: 1,
            total: 1
        }));
        assert_eq!(events.last(), Some(&GameEvent::LevelLoaded { index: 1 }));
        assert_eq!(state.level.index, 1);
        assert_eq!(state.progress.level_index, 1);
        assert_eq!(state.progress.score, 10);
        assert_eq!(state.progress.high_score, 10);
        assert_eq!(state.player.body.pos, Vec2::new(40.0, 50.0));
        assert_eq!(state.phase, LevelPhase::Active);
    }

    #[test]
    fn test_last_level_completes_game() {
        let mut state = state_from(
            r#"{ "levels": [{
                "collectibles": [{ "position": { "x": 135, "y": 322 } }],
                "startPosition": { "x": 100, "y": 300 }
            }] }"#,
        );
        tick(&mut state, &TickInput::default());
        assert!(state.is_finished());
        assert_eq!(state.drain_events().last(), Some(&GameEvent::GameComplete));
        assert_eq!(state.progress.level_index, 0);
    }

    #[test]
    fn test_defeat_respawns_and_resets_items() {
        let mut state = state_from(
            r#"{ "levels": [{
                "collectibles": [{ "position": { "x": 135, "y": 322 } }, { "position": { "x": 1500, "y": 0 } }],
                "requiredCollectibles": 2,
                "hazards": [{ "position": { "x": 150, "y": 400 } }],
                "startPosition": { "x": 100, "y": 300 }
            }] }"#,
        );
        tick(&mut state, &TickInput::default());

        assert!(state.events.contains(&GameEvent::PlayerDefeated));
        assert_eq!(state.phase, LevelPhase::Active);
        assert_eq!(state.player.body.pos, Vec2::new(100.0, 300.0));
        assert_eq!(state.player.body.vel, Vec2::ZERO);
        assert_eq!(state.level.collectibles.collected_count(), 0);
        // Score survives a defeat
        assert_eq!(state.progress.score, 10);
    }

    #[test]
    fn test_landing_is_stable() {
        let mut state = state_from(FLOOR_LEVEL);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        let rest = state.player.body.pos;
        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.player.body.pos, rest);
            assert!(state.player.on_ground);
        }
    }

    /// No platforms and a floor far below, so nothing stops a fall
    const OPEN_SKY: &str = r#"{ "levels": [{
        "collectibles": [{ "position": { "x": 1500, "y": 0 } }],
        "startPosition": { "x": 100, "y": 0 },
        "height": 100000
    }] }"#;

    proptest! {
        #[test]
        fn prop_gravity_accumulates(steps in 1u32..200) {
            let mut state = state_from(OPEN_SKY);
            for n in 1..=steps {
                tick(&mut state, &TickInput::default());
                prop_assert!(!state.player.on_ground);
                prop_assert_eq!(state.player.body.vel.y, n as f32 * 0.5);
            }
        }

        #[test]
        fn prop_landing_from_any_height(start_y in 0.0f32..420.0) {
            let mut state = state_from(FLOOR_LEVEL);
            state.player.body.pos.y = start_y;
            for _ in 0..200 {
                tick(&mut state, &TickInput::default());
            }
            prop_assert!(state.player.on_ground);
            prop_assert_eq!(state.player.body.vel.y, 0.0);
            prop_assert_eq!(state.player.rect().bottom(), 500.0);

            let rest = state.player.body.pos;
            for _ in 0..20 {
                tick(&mut state, &TickInput::default());
                prop_assert_eq!(state.player.body.pos, rest);
                prop_assert_eq!(state.player.body.vel.y, 0.0);
                prop_assert!(state.player.on_ground);
            }
        }

        #[test]
        fn prop_player_stays_in_level(
            inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400)
        ) {
            let mut state = state_from(FLOOR_LEVEL);
            for (move_left, move_right, jump_requested) in inputs {
                let input = TickInput { move_left, move_right, jump_requested };
                tick(&mut state, &input);

                let rect = state.player.rect();
                prop_assert!(rect.pos.x >= 0.0);
                prop_assert!(rect.right() <= 1600.0);
                // Never sinks into the floor platform
                prop_assert!(rect.bottom() <= 500.0);
                prop_assert!(state.camera_x >= 0.0 && state.camera_x <= 800.0);
            }
        }
    }
}
