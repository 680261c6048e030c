//! Level progression state machine and the progress record
//!
//! `Loading -> Active -> (Completed | PlayerDefeated) -> ...`. Completion is
//! checked before defeat; a step that satisfies both only completes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::collectible::CollectibleTracker;
use super::patrol::Hazard;

/// Phase of the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Entities are being instantiated from a template
    Loading,
    /// Simulation running
    Active,
    /// Collectible threshold met this step
    Completed,
    /// Player touched a hazard this step
    PlayerDefeated,
    /// Last level completed; no further steps run
    GameComplete,
}

/// A transition the progression check asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Complete,
    Defeat,
}

/// Decide this step's transition. Completion wins over defeat.
pub fn evaluate(tracker: &CollectibleTracker, player: &Rect, hazards: &[Hazard]) -> Transition {
    if tracker.is_complete() {
        return Transition::Complete;
    }
    // Full body overlap, not the shrunk pickup reach
    if hazards.iter().any(|h| h.rect().overlaps(player)) {
        return Transition::Defeat;
    }
    Transition::None
}

/// A saved collectible coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPoint {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for SavedPoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<SavedPoint> for Vec2 {
    fn from(p: SavedPoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// The single durable record of a player's progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub level_index: usize,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub collected: Vec<SavedPoint>,
    #[serde(default)]
    pub high_score: u64,
}

impl ProgressState {
    /// Raise the high score to the current score if it beats it
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Clamp the level index into `[0, level_count)`
    pub fn clamp_level(&mut self, level_count: usize) {
        let last = level_count.saturating_sub(1);
        if self.level_index > last {
            log::warn!(
                "Saved level {} out of range, clamping to {}",
                self.level_index,
                last
            );
            self.level_index = last;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collectible::Collectible;

    fn tracker(collected: usize, total: usize, required: usize) -> CollectibleTracker {
        let mut items: Vec<_> = (0..total)
            .map(|i| Collectible::new(Vec2::new(i as f32 * 100.0, 0.0), 30.0))
            .collect();
        for item in items.iter_mut().take(collected) {
            item.collected = true;
        }
        CollectibleTracker::new(items, required, 10)
    }

    fn hazard_at(x: f32, y: f32) -> Hazard {
        Hazard::new(Vec2::new(x, y), Vec2::new(40.0, 60.0), 2.0, 100.0, 30)
    }

    #[test]
    fn test_completion_threshold() {
        let player = Rect::new(0.0, 0.0, 100.0, 74.0);
        assert_eq!(evaluate(&tracker(2, 3, 3), &player, &[]), Transition::None);
        assert_eq!(evaluate(&tracker(3, 3, 3), &player, &[]), Transition::Complete);
    }

    #[test]
    fn test_defeat_on_full_overlap() {
        let player = Rect::new(0.0, 0.0, 100.0, 74.0);
        let t = tracker(0, 3, 3);
        assert_eq!(evaluate(&t, &player, &[hazard_at(90.0, 10.0)]), Transition::Defeat);
        assert_eq!(evaluate(&t, &player, &[hazard_at(100.0, 10.0)]), Transition::None);
    }

    #[test]
    fn test_completion_takes_priority() {
        let player = Rect::new(0.0, 0.0, 100.0, 74.0);
        let t = tracker(3, 3, 3);
        assert_eq!(
            evaluate(&t, &player, &[hazard_at(10.0, 10.0)]),
            Transition::Complete
        );
    }

    #[test]
    fn test_progress_json_field_names() {
        let json = r#"{ "levelIndex": 2, "score": 40, "collected": [{ "x": 1.0, "y": 2.0 }] }"#;
        let progress: ProgressState = serde_json::from_str(json).unwrap();
        assert_eq!(progress.level_index, 2);
        assert_eq!(progress.score, 40);
        assert_eq!(progress.collected, vec![SavedPoint { x: 1.0, y: 2.0 }]);
        assert_eq!(progress.high_score, 0);
    }

    #[test]
    fn test_high_score_and_clamp() {
        let mut progress = ProgressState {
            level_index: 7,
            score: 30,
            ..Default::default()
        };
        assert!(progress.record_high_score());
        assert!(!progress.record_high_score());
        assert_eq!(progress.high_score, 30);

        progress.clamp_level(3);
        assert_eq!(progress.level_index, 2);
    }
}
