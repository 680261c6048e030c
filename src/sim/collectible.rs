//! Collectibles and the per-level collection tracker
//!
//! Pickup uses center distance on each axis with a divisor of 3 rather than
//! full AABB contact, so the player has to get properly close.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::progression::SavedPoint;

/// A single collectible item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub rect: Rect,
    /// Flips to true once; only a defeat reset or reload clears it
    pub collected: bool,
    /// Steps since collection (cosmetic fade only)
    pub decay_timer: u32,
}

impl Collectible {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            rect: Rect {
                pos,
                size: Vec2::splat(size),
            },
            collected: false,
            decay_timer: 0,
        }
    }

    /// Opacity for drawing, 1.0 until collected then fading to 0
    pub fn alpha(&self, fade_steps: u32) -> f32 {
        if !self.collected {
            return 1.0;
        }
        if fade_steps == 0 {
            return 0.0;
        }
        (1.0 - self.decay_timer as f32 / fade_steps as f32).max(0.0)
    }

    fn reset(&mut self) {
        self.collected = false;
        self.decay_timer = 0;
    }
}

/// Whether `player` is close enough to pick up `item`
#[inline]
pub fn within_pickup_range(player: &Rect, item: &Rect) -> bool {
    let delta = (player.center() - item.center()).abs();
    let reach = (player.size + item.size) / 3.0;
    delta.x < reach.x && delta.y < reach.y
}

/// A pickup that happened this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub position: Vec2,
    pub points: u64,
}

/// Tracks the collectibles of the current level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleTracker {
    pub items: Vec<Collectible>,
    required: usize,
    points: u64,
}

impl CollectibleTracker {
    pub fn new(items: Vec<Collectible>, required: usize, points: u64) -> Self {
        Self {
            items,
            required,
            points,
        }
    }

    /// Collect everything within reach of the player
    pub fn collect_near(&mut self, player: &Rect) -> Vec<Pickup> {
        let mut pickups = Vec::new();
        for item in self.items.iter_mut().filter(|i| !i.collected) {
            if within_pickup_range(player, &item.rect) {
                item.collected = true;
                pickups.push(Pickup {
                    position: item.rect.pos,
                    points: self.points,
                });
            }
        }
        pickups
    }

    /// Advance the cosmetic fade of collected items
    pub fn tick_fade(&mut self, fade_steps: u32) {
        for item in self.items.iter_mut().filter(|i| i.collected) {
            if item.decay_timer < fade_steps {
                item.decay_timer += 1;
            }
        }
    }

    pub fn collected_count(&self) -> usize {
        self.items.iter().filter(|i| i.collected).count()
    }

    pub fn required_count(&self) -> usize {
        self.required
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    /// Collected over required, 1.0 when nothing is required
    pub fn progress_ratio(&self) -> f32 {
        if self.required == 0 {
            return 1.0;
        }
        (self.collected_count() as f32 / self.required as f32).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.collected_count() >= self.required
    }

    /// Mark every item uncollected
    pub fn reset_all(&mut self) {
        for item in &mut self.items {
            item.reset();
        }
    }

    /// Positions of collected items, the persistence key
    pub fn collected_positions(&self) -> Vec<SavedPoint> {
        self.items
            .iter()
            .filter(|i| i.collected)
            .map(|i| SavedPoint::from(i.rect.pos))
            .collect()
    }

    /// Re-apply saved collection flags by exact position match.
    /// Returns how many items were restored.
    pub fn restore(&mut self, saved: &[SavedPoint]) -> usize {
        let mut restored = 0;
        for point in saved {
            let pos = Vec2::from(*point);
            if let Some(item) = self
                .items
                .iter_mut()
                .find(|i| !i.collected && i.rect.pos == pos)
            {
                item.collected = true;
                // Already gone, skip the fade
                item.decay_timer = u32::MAX;
                restored += 1;
            }
        }
        restored
    }
}
