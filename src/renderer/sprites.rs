//! Sprite load tracking
//!
//! Image loads finish whenever the browser gets to them. Each request is
//! tagged with the level generation that made it so a load finishing after a
//! level change cannot overwrite the newer level's slot.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum SpriteState<T> {
    Pending,
    Ready(T),
    Failed,
}

#[derive(Debug, Clone)]
pub struct SpriteSlot<T> {
    pub source: String,
    pub state: SpriteState<T>,
    /// Level generation that requested this load
    pub generation: u64,
    failure_reported: bool,
}

impl<T> SpriteSlot<T> {
    fn new(source: &str, generation: u64) -> Self {
        Self {
            source: source.to_string(),
            state: SpriteState::Pending,
            generation,
            failure_reported: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SpriteState::Ready(_))
    }
}

/// Named sprite slots
#[derive(Debug, Clone)]
pub struct SpriteSet<T> {
    slots: HashMap<String, SpriteSlot<T>>,
}

impl<T> Default for SpriteSet<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> SpriteSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a load. Re-requesting resets the slot to pending.
    pub fn request(&mut self, name: &str, source: &str, generation: u64) {
        self.slots
            .insert(name.to_string(), SpriteSlot::new(source, generation));
    }

    /// Apply a finished load. Returns false if the load was stale.
    pub fn complete(&mut self, name: &str, generation: u64, image: T) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) if slot.generation == generation => {
                log::info!("Sprite '{}' loaded", name);
                slot.state = SpriteState::Ready(image);
                true
            }
            Some(slot) => {
                log::debug!(
                    "Ignoring stale load of '{}' (generation {} < {})",
                    name,
                    generation,
                    slot.generation
                );
                false
            }
            None => false,
        }
    }

    /// Mark a load failed. Returns false if the load was stale.
    pub fn fail(&mut self, name: &str, generation: u64) -> bool {
        match self.slots.get_mut(name) {
            Some(slot) if slot.generation == generation => {
                log::error!("Failed to load sprite '{}' from {}", name, slot.source);
                slot.state = SpriteState::Failed;
                slot.failure_reported = true;
                true
            }
            _ => false,
        }
    }

    pub fn slot(&self, name: &str) -> Option<&SpriteSlot<T>> {
        self.slots.get(name)
    }

    /// The image if it is ready to draw
    pub fn get(&self, name: &str) -> Option<&T> {
        match &self.slots.get(name)?.state {
            SpriteState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Run `draw` with the image if it is ready; otherwise do nothing.
    /// Returns whether anything was drawn.
    pub fn draw_with<F: FnOnce(&T)>(&mut self, name: &str, draw: F) -> bool {
        let Some(slot) = self.slots.get_mut(name) else {
            return false;
        };
        match &slot.state {
            SpriteState::Ready(image) => {
                draw(image);
                true
            }
            SpriteState::Failed => {
                if !slot.failure_reported {
                    log::warn!("Sprite '{}' unavailable, skipping draw", name);
                    slot.failure_reported = true;
                }
                false
            }
            SpriteState::Pending => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
