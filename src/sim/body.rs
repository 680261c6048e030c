//! Kinematic bodies
//!
//! Positions use a top-left origin with +y pointing down. Velocities are in
//! units per simulation step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use crate::tuning::{PhysicsTuning, PlayerTuning};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// A moving rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x > 0.0 && size.y > 0.0, "body size must be positive");
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Gravity applies every step; contact resolution zeroes it afterwards
    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.vel.y += gravity;
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Landed on a surface this step
    pub on_ground: bool,
    /// Airborne because of a jump (cleared on landing)
    pub jumping: bool,
    /// Horizontal input held this step
    pub moving: bool,
    pub facing: Facing,
    /// Steps left before another jump may trigger
    pub jump_cooldown: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(tuning.width, tuning.height)),
            on_ground: false,
            jumping: false,
            moving: false,
            facing: Facing::Right,
            jump_cooldown: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Derive this step's horizontal velocity from the intent and trigger a
    /// jump when allowed. Returns true if a jump started.
    pub fn apply_intent(&mut self, input: &TickInput, physics: &PhysicsTuning) -> bool {
        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        // Not persistent: recomputed from intent every step. Left wins a tie.
        self.body.vel.x = 0.0;
        self.moving = false;
        if input.move_right {
            self.body.vel.x = physics.move_speed;
            self.moving = true;
            self.facing = Facing::Right;
        }
        if input.move_left {
            self.body.vel.x = -physics.move_speed;
            self.moving = true;
            self.facing = Facing::Left;
        }

        if input.jump_requested && self.on_ground && self.jump_cooldown == 0 {
            self.body.vel.y = physics.jump_force;
            self.on_ground = false;
            self.jumping = true;
            self.jump_cooldown = physics.jump_cooldown_steps;
            return true;
        }
        false
    }

    /// Place the player at `pos` with no motion
    pub fn reset_to(&mut self, pos: Vec2) {
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.on_ground = false;
        self.jumping = false;
        self.moving = false;
        self.jump_cooldown = 0;
    }
}
