//! Game state and the per-level entity instance
//!
//! All mutable simulation state lives here. A level load builds a complete
//! `LevelInstance` first and then swaps it in whole.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Player, Rect};
use super::collectible::{Collectible, CollectibleTracker};
use super::collision::LevelBounds;
use super::patrol::Hazard;
use super::progression::{LevelPhase, ProgressState};
use crate::level::{LevelSet, LevelTemplate};
use crate::tuning::Tuning;

/// Things that happened during a step, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    Collected { position: Vec2, points: u64 },
    LevelCompleted { index: usize, collected: usize, total: usize },
    LevelLoaded { index: usize },
    PlayerDefeated,
    GameComplete,
}

/// Mutable entities of the level being played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelInstance {
    pub index: usize,
    pub name: String,
    pub platforms: Vec<Rect>,
    pub collectibles: CollectibleTracker,
    pub hazards: Vec<Hazard>,
    pub bounds: LevelBounds,
    pub start: Vec2,
    pub respawn: Vec2,
    pub background: Option<String>,
}

impl LevelInstance {
    /// Fresh entities from a template
    pub fn instantiate(index: usize, template: &LevelTemplate, tuning: &Tuning) -> Self {
        let items = template
            .collectibles
            .iter()
            .map(|&pos| Collectible::new(pos, tuning.collectible.size))
            .collect();
        let hazards = template
            .hazards
            .iter()
            .map(|spawn| {
                Hazard::new(
                    spawn.pos,
                    spawn.size,
                    spawn.speed,
                    spawn.move_distance,
                    tuning.hazard.direction_change_cooldown,
                )
            })
            .collect();

        Self {
            index,
            name: template.name.clone(),
            platforms: template.platforms.clone(),
            collectibles: CollectibleTracker::new(
                items,
                template.required_collectibles,
                tuning.collectible.points,
            ),
            hazards,
            bounds: LevelBounds::new(template.width, template.height),
            start: template.start_position,
            respawn: template.respawn_position,
            background: template.background.clone(),
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub levels: LevelSet,
    pub level: LevelInstance,
    pub player: Player,
    /// Left edge of the view in level units
    pub camera_x: f32,
    pub phase: LevelPhase,
    /// Index and score; collected coordinates are filled in on save
    pub progress: ProgressState,
    /// Simulation step counter
    pub time_ticks: u64,
    /// Bumped on every level load; lets late asset loads detect they are stale
    pub generation: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start at the first level with no progress
    pub fn new(levels: LevelSet, tuning: Tuning) -> Self {
        Self::with_progress(levels, tuning, ProgressState::default())
    }

    /// Resume from a saved progress record
    pub fn with_progress(levels: LevelSet, tuning: Tuning, mut progress: ProgressState) -> Self {
        progress.clamp_level(levels.len());
        let index = progress.level_index;
        let saved = std::mem::take(&mut progress.collected);
        let level = build_level(&levels, &tuning, index);
        let player = Player::new(level.start, &tuning.player);

        let mut state = Self {
            tuning,
            levels,
            level,
            player,
            camera_x: 0.0,
            phase: LevelPhase::Loading,
            progress,
            time_ticks: 0,
            generation: 0,
            events: Vec::new(),
        };
        state.enter_level();

        let restored = state.level.collectibles.restore(&saved);
        if restored > 0 {
            log::info!("Restored {} collected items", restored);
        }
        state
    }

    /// Replace the level entities with fresh ones from template `index`
    pub fn load_level(&mut self, index: usize) {
        self.phase = LevelPhase::Loading;
        self.level = build_level(&self.levels, &self.tuning, index);
        self.enter_level();
    }

    /// Put the player at the start of the freshly swapped-in level
    fn enter_level(&mut self) {
        let index = self.level.index;
        self.player.reset_to(self.level.start);
        self.camera_x = 0.0;
        self.generation += 1;
        self.progress.level_index = index;
        self.progress.collected.clear();
        self.phase = LevelPhase::Active;
        self.events.push(GameEvent::LevelLoaded { index });
    }

    /// Go back one level. Returns false on the first level.
    pub fn previous_level(&mut self) -> bool {
        let index = self.level.index;
        if index == 0 {
            return false;
        }
        log::info!("Returning to level {}", index);
        self.load_level(index - 1);
        true
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn has_next_level(&self) -> bool {
        self.level.index + 1 < self.levels.len()
    }

    /// Progress as it should be persisted right now
    pub fn progress_snapshot(&self) -> ProgressState {
        ProgressState {
            collected: self.level.collectibles.collected_positions(),
            ..self.progress.clone()
        }
    }

    /// Move the camera to follow the player, clamped to the level
    pub fn update_camera(&mut self) {
        let viewport = self.tuning.world.viewport_width;
        let max_x = (self.level.bounds.width() - viewport).max(0.0);
        let target = self.player.body.pos.x - viewport / 3.0;
        self.camera_x = target.clamp(0.0, max_x);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == LevelPhase::GameComplete
    }
}

fn build_level(levels: &LevelSet, tuning: &Tuning, index: usize) -> LevelInstance {
    let instance = match levels.get(index) {
        Some(template) => LevelInstance::instantiate(index, template, tuning),
        None => {
            log::error!("Level {} does not exist, loading the built-in level", index);
            LevelInstance::instantiate(index, &LevelTemplate::fallback(tuning), tuning)
        }
    };
    log::info!(
        "Loading level {} '{}': {} platforms, {} collectibles ({} required), {} hazards",
        index + 1,
        instance.name,
        instance.platforms.len(),
        instance.collectibles.total_count(),
        instance.collectibles.required_count(),
        instance.hazards.len()
    );
    instance
}
