//! The owl guide
//!
//! Dialogue is a queue of lines advanced only by explicit `advance` calls.
//! The speech bubble shown on interaction hides itself after a step-counted
//! delay driven by `tick`.

use std::collections::VecDeque;

use glam::Vec2;

use crate::ms_to_steps;
use crate::sim::Rect;

/// Player and guide centers closer than this on both axes show the hint
pub const INTERACTION_RADIUS: f32 = 150.0;
/// How long the speech bubble stays up
pub const BUBBLE_MS: f64 = 3000.0;

const DEFAULT_POSITION: Vec2 = Vec2::new(300.0, 391.0);
/// 282px frames drawn at half scale
const DEFAULT_SIZE: f32 = 141.0;

/// Tutorial scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Movement,
    Collectibles,
    Completion,
}

impl Topic {
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Topic::Movement => &[
                "Hello, young knight! I'll help you find your feet.",
                "Use A/D or the arrow keys to walk left and right.",
                "Press W, Up or Space to jump.",
                "Try gathering a few apples!",
            ],
            Topic::Collectibles => &[
                "Well done! Apples earn you points.",
                "Some apples sit in hard-to-reach places.",
                "Careful, monsters roam these paths!",
            ],
            Topic::Completion => &[
                "Congratulations! You gathered the apples on this level!",
                "Ready for the next one?",
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Guide {
    pub rect: Rect,
    queue: VecDeque<String>,
    current: Option<String>,
    /// Player is within interaction range
    pub hint_visible: bool,
    bubble_steps: u32,
}

impl Default for Guide {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION)
    }
}

impl Guide {
    pub fn new(position: Vec2) -> Self {
        Self {
            rect: Rect {
                pos: position,
                size: Vec2::splat(DEFAULT_SIZE),
            },
            queue: VecDeque::new(),
            current: None,
            hint_visible: false,
            bubble_steps: 0,
        }
    }

    /// Replace the queue with a tutorial and show its first line
    pub fn show_tutorial(&mut self, topic: Topic) {
        self.set_queue(topic.lines().iter().map(|s| s.to_string()));
    }

    pub fn show_level_completion(&mut self, collected: usize, total: usize) {
        let verdict = if collected == total {
            "Splendid! You found every single apple!"
        } else {
            "Try to find more apples next time!"
        };
        self.set_queue([
            format!("Great job! You gathered {} of {} apples on this level!", collected, total),
            verdict.to_string(),
            "Press F to continue.".to_string(),
        ]);
    }

    fn set_queue(&mut self, lines: impl IntoIterator<Item = String>) {
        self.queue = lines.into_iter().collect();
        self.current = self.queue.pop_front();
    }

    /// Move to the next line; hides the dialogue after the last one
    pub fn advance(&mut self) {
        if self.current.is_some() {
            self.current = self.queue.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Lines waiting after the current one
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn update_hint(&mut self, player: &Rect) -> bool {
        let delta = (player.center() - self.rect.center()).abs();
        self.hint_visible = delta.x < INTERACTION_RADIUS && delta.y < INTERACTION_RADIUS;
        self.hint_visible
    }

    /// Pop the speech bubble if the player is in range
    pub fn interact(&mut self) -> bool {
        if !self.hint_visible {
            return false;
        }
        self.bubble_steps = ms_to_steps(BUBBLE_MS);
        true
    }

    pub fn bubble_visible(&self) -> bool {
        self.bubble_steps > 0
    }

    /// One simulation step of bubble countdown
    pub fn tick(&mut self) {
        self.bubble_steps = self.bubble_steps.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_queue_advances_explicitly() {
        let mut guide = Guide::default();
        assert!(!guide.is_active());

        guide.show_tutorial(Topic::Completion);
        assert_eq!(guide.current(), Some(Topic::Completion.lines()[0]));
        assert_eq!(guide.pending(), 1);

        // Ticking never advances dialogue
        for _ in 0..1000 {
            guide.tick();
        }
        assert_eq!(guide.current(), Some(Topic::Completion.lines()[0]));

        guide.advance();
        assert_eq!(guide.current(), Some(Topic::Completion.lines()[1]));
        guide.advance();
        assert!(!guide.is_active());
        guide.advance();
        assert!(!guide.is_active());
    }

    #[test]
    fn test_new_tutorial_replaces_queue() {
        let mut guide = Guide::default();
        guide.show_tutorial(Topic::Movement);
        guide.show_tutorial(Topic::Collectibles);
        assert_eq!(guide.current(), Some(Topic::Collectibles.lines()[0]));
        assert_eq!(guide.pending(), 2);
    }

    #[test]
    fn test_level_completion_message() {
        let mut guide = Guide::default();
        guide.show_level_completion(7, 10);
        assert_eq!(
            guide.current(),
            Some("Great job! You gathered 7 of 10 apples on this level!")
        );
        guide.advance();
        assert_eq!(guide.current(), Some("Try to find more apples next time!"));

        guide.show_level_completion(3, 3);
        guide.advance();
        assert_eq!(guide.current(), Some("Splendid! You found every single apple!"));
    }

    #[test]
    fn test_completion_prompt_names_interact_key() {
        use crate::platform::input::Action;

        let mut guide = Guide::default();
        guide.show_level_completion(1, 2);
        guide.advance();
        guide.advance();
        assert_eq!(guide.current(), Some("Press F to continue."));
        assert_eq!(Action::from_key("F"), Some(Action::Interact));
        assert_eq!(Action::from_key(" "), Some(Action::Jump));
    }

    #[test]
    fn test_hint_radius() {
        let mut guide = Guide::new(Vec2::ZERO);
        // Guide center (70.5, 70.5); player 100x74
        let near = Rect::new(70.5 + 149.0 - 50.0, 70.5 - 37.0, 100.0, 74.0);
        let far = Rect::new(70.5 + 151.0 - 50.0, 70.5 - 37.0, 100.0, 74.0);
        assert!(guide.update_hint(&near));
        assert!(!guide.update_hint(&far));
    }

    #[test]
    fn test_bubble_hides_after_three_seconds() {
        let mut guide = Guide::new(Vec2::ZERO);
        assert!(!guide.interact());

        guide.update_hint(&Rect::new(0.0, 0.0, 100.0, 74.0));
        assert!(guide.interact());
        for _ in 0..179 {
            guide.tick();
        }
        assert!(guide.bubble_visible());
        guide.tick();
        assert!(!guide.bubble_visible());
    }
}
