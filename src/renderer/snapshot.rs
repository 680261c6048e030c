//! Read-only view of the game for the presentation layer

use glam::Vec2;

use crate::guide::Guide;
use crate::sim::{Facing, GameState, LevelPhase, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub rect: Rect,
    pub facing: Facing,
    pub on_ground: bool,
    pub moving: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HazardView {
    pub rect: Rect,
    pub facing: Facing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectibleView {
    pub rect: Rect,
    pub collected: bool,
    /// 1.0 until collected, then fading out
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuideView {
    pub rect: Rect,
    pub dialogue: Option<String>,
    pub hint_visible: bool,
    pub bubble_visible: bool,
}

impl GuideView {
    pub fn capture(guide: &Guide) -> Self {
        Self {
            rect: guide.rect,
            dialogue: guide.current().map(str::to_string),
            hint_visible: guide.hint_visible,
            bubble_visible: guide.bubble_visible(),
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub camera_x: f32,
    pub level_size: Vec2,
    pub player: PlayerView,
    pub hazards: Vec<HazardView>,
    pub collectibles: Vec<CollectibleView>,
    pub platforms: Vec<Rect>,
    pub score: u64,
    pub high_score: u64,
    pub progress_ratio: f32,
    pub collected: usize,
    pub required: usize,
    pub level_index: usize,
    pub level_count: usize,
    pub level_name: String,
    pub background: Option<String>,
    pub phase: LevelPhase,
    pub generation: u64,
    pub guide: Option<GuideView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState, fade_steps: u32) -> Self {
        let level = &state.level;
        let tracker = &level.collectibles;
        Self {
            camera_x: state.camera_x,
            level_size: Vec2::new(level.bounds.width(), level.bounds.bottom),
            player: PlayerView {
                rect: state.player.rect(),
                facing: state.player.facing,
                on_ground: state.player.on_ground,
                moving: state.player.moving,
            },
            hazards: level
                .hazards
                .iter()
                .map(|h| HazardView {
                    rect: h.rect(),
                    facing: h.facing(),
                })
                .collect(),
            collectibles: tracker
                .items
                .iter()
                .map(|c| CollectibleView {
                    rect: c.rect,
                    collected: c.collected,
                    alpha: c.alpha(fade_steps),
                })
                .collect(),
            platforms: level.platforms.clone(),
            score: state.progress.score,
            high_score: state.progress.high_score.max(state.progress.score),
            progress_ratio: tracker.progress_ratio(),
            collected: tracker.collected_count(),
            required: tracker.required_count(),
            level_index: level.index,
            level_count: state.level_count(),
            level_name: level.name.clone(),
            background: level.background.clone(),
            phase: state.phase,
            generation: state.generation,
            guide: None,
        }
    }

    pub fn with_guide(mut self, guide: &Guide) -> Self {
        self.guide = Some(GuideView::capture(guide));
        self
    }

    /// Collectibles still worth drawing
    pub fn visible_collectibles(&self) -> impl Iterator<Item = &CollectibleView> {
        self.collectibles.iter().filter(|c| c.alpha > 0.0)
    }

    /// Level-to-minimap scale for a minimap `width` wide
    pub fn minimap_scale(&self, width: f32) -> f32 {
        if self.level_size.x <= 0.0 {
            return 0.0;
        }
        width / self.level_size.x
    }

    /// Level-space x to screen x
    #[inline]
    pub fn to_screen_x(&self, x: f32) -> f32 {
        x - self.camera_x
    }
}
