//! Keyboard and touch input mapping
//!
//! Key names follow `KeyboardEvent.key`. Held state is kept per source and
//! merged into a [`TickInput`] before each step.

use crate::sim::TickInput;

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

/// Logical action a key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Jump,
    Interact,
}

impl Action {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Action::Left),
            "d" | "D" | "ArrowRight" => Some(Action::Right),
            "w" | "W" | "ArrowUp" | " " => Some(Action::Jump),
            "f" | "F" => Some(Action::Interact),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_left: bool,
    key_right: bool,
    key_jump: bool,
    touch_left: bool,
    touch_right: bool,
    touch_jump: bool,
    /// Set on an interact key press, consumed once
    interact_pressed: bool,
    interact_held: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is one the game uses
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::Left => self.key_left = true,
            Action::Right => self.key_right = true,
            Action::Jump => self.key_jump = true,
            Action::Interact => {
                // Key repeat must not retrigger
                if !self.interact_held {
                    self.interact_pressed = true;
                }
                self.interact_held = true;
            }
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = Action::from_key(key) else {
            return false;
        };
        match action {
            Action::Left => self.key_left = false,
            Action::Right => self.key_right = false,
            Action::Jump => self.key_jump = false,
            Action::Interact => self.interact_held = false,
        }
        true
    }

    pub fn set_touch(&mut self, button: TouchButton, pressed: bool) {
        match button {
            TouchButton::Left => self.touch_left = pressed,
            TouchButton::Right => self.touch_right = pressed,
            TouchButton::Jump => self.touch_jump = pressed,
        }
    }

    /// Drop all held state, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Intent for the next step
    pub fn intent(&self) -> TickInput {
        TickInput {
            move_left: self.key_left || self.touch_left,
            move_right: self.key_right || self.touch_right,
            jump_requested: self.key_jump || self.touch_jump,
        }
    }

    /// Edge-triggered interact press
    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_pressed)
    }
}
