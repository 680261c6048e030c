//! Game session
//!
//! Glues the simulation to its collaborators: input goes in before each
//! step, events come out after it and drive saving and the guide.

use crate::guide::{Guide, Topic};
use crate::level::LevelSet;
use crate::persistence::{KeyValueStore, Persistence};
use crate::platform::InputState;
use crate::renderer::RenderSnapshot;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};
use crate::tuning::Tuning;

pub struct Game<S> {
    pub state: GameState,
    pub guide: Guide,
    pub input: InputState,
    pub settings: Settings,
    persistence: Persistence<S>,
    /// Events for the host (audio, UI) since the last `take_events`
    events: Vec<GameEvent>,
    collectibles_explained: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// Start a session, resuming saved progress if there is any
    pub fn new(levels: LevelSet, tuning: Tuning, store: S) -> Self {
        let mut persistence = Persistence::new(store);
        let settings = Settings::load(persistence.store());
        let mut state = match persistence.load() {
            Some(progress) => GameState::with_progress(levels, tuning, progress),
            None => GameState::new(levels, tuning),
        };
        state.progress.high_score = state.progress.high_score.max(persistence.high_score());

        let mut game = Self {
            state,
            guide: Guide::default(),
            input: InputState::new(),
            settings,
            persistence,
            events: Vec::new(),
            collectibles_explained: false,
        };
        game.handle_events();
        game
    }

    /// Run one simulation step with the current input
    pub fn step(&mut self) {
        if self.input.take_interact() {
            if self.guide.is_active() {
                self.guide.advance();
            } else {
                self.guide.interact();
            }
        }

        let intent = self.input.intent();
        tick(&mut self.state, &intent);

        self.guide.tick();
        self.guide.update_hint(&self.state.player.rect());
        self.handle_events();
    }

    fn handle_events(&mut self) {
        let events = self.state.drain_events();
        for event in &events {
            match *event {
                GameEvent::LevelCompleted {
                    collected, total, ..
                } => {
                    self.save();
                    self.guide.show_level_completion(collected, total);
                }
                GameEvent::PlayerDefeated => {
                    self.save();
                }
                GameEvent::LevelLoaded { index: 0 } => {
                    self.guide.show_tutorial(Topic::Movement);
                }
                GameEvent::Collected { .. } => {
                    if !self.collectibles_explained && !self.guide.is_active() {
                        self.collectibles_explained = true;
                        self.guide.show_tutorial(Topic::Collectibles);
                    }
                }
                _ => {}
            }
        }
        self.events.extend(events);
    }

    fn save(&mut self) -> bool {
        let saved = self.persistence.save(&self.state.progress_snapshot());
        self.state.progress.high_score = self.persistence.high_score();
        saved
    }

    /// Explicit save point, e.g. when the tab is hidden
    pub fn checkpoint(&mut self) -> bool {
        log::info!("Checkpoint");
        self.save()
    }

    /// Forget stored progress and start from the first level
    pub fn new_game(&mut self) {
        self.persistence.clear();
        let levels = self.state.levels.clone();
        let tuning = self.state.tuning.clone();
        let high_score = self.state.progress.high_score;

        self.state = GameState::new(levels, tuning);
        self.state.progress.high_score = high_score;
        self.guide.clear();
        self.input.release_all();
        self.collectibles_explained = false;
        log::info!("New game started");
        self.handle_events();
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let fade = self
            .settings
            .fade_steps(self.state.tuning.collectible.fade_steps);
        RenderSnapshot::capture(&self.state, fade).with_guide(&self.guide)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replay the level before this one and save the new position
    pub fn previous_level(&mut self) -> bool {
        if !self.state.previous_level() {
            return false;
        }
        self.guide.clear();
        self.input.release_all();
        self.save();
        self.handle_events();
        true
    }

    pub fn save_settings(&mut self) {
        self.settings.save(self.persistence.store_mut());
    }

    /// Flip the minimap and persist the preference
    pub fn toggle_minimap(&mut self) {
        self.settings.show_minimap = !self.settings.show_minimap;
        self.save_settings();
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }
}
