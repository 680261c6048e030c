//! Per-axis AABB collision resolution
//!
//! A body moves along X first and is pushed out of any overlapped obstacle,
//! then along Y. Obstacles are visited in level order and each correction is
//! applied in turn, so on conflicting overlaps the last one wins.

use serde::{Deserialize, Serialize};

use super::body::{Body, Rect};

/// Contact flags produced by one move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Landed on top of something this step
    pub grounded: bool,
    /// Pushed back while moving left
    pub blocked_left: bool,
    /// Pushed back while moving right
    pub blocked_right: bool,
    /// Hit the underside of something while rising
    pub hit_ceiling: bool,
}

impl Contact {
    pub fn blocked(&self) -> bool {
        self.blocked_left || self.blocked_right
    }
}

/// Level edges a body is kept inside. There is no top bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl LevelBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            right: width,
            bottom: height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// True if `rect` overlaps any obstacle
pub fn overlaps_any(rect: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| rect.overlaps(o))
}

/// Snap the body out of overlapped obstacles opposite its X travel.
/// Velocity is left alone; horizontal speed is re-derived next step.
pub fn resolve_horizontal(body: &mut Body, obstacles: &[Rect], contact: &mut Contact) {
    for obstacle in obstacles {
        if !body.rect().overlaps(obstacle) {
            continue;
        }
        if body.vel.x > 0.0 {
            body.pos.x = obstacle.pos.x - body.size.x;
            contact.blocked_right = true;
        } else if body.vel.x < 0.0 {
            body.pos.x = obstacle.right();
            contact.blocked_left = true;
        }
    }
}

/// Snap the body out of overlapped obstacles opposite its Y travel
pub fn resolve_vertical(body: &mut Body, obstacles: &[Rect], contact: &mut Contact) {
    for obstacle in obstacles {
        if !body.rect().overlaps(obstacle) {
            continue;
        }
        if body.vel.y > 0.0 {
            body.pos.y = obstacle.pos.y - body.size.y;
            body.vel.y = 0.0;
            contact.grounded = true;
        } else if body.vel.y < 0.0 {
            body.pos.y = obstacle.bottom();
            body.vel.y = 0.0;
            contact.hit_ceiling = true;
        }
    }
}

/// Move the body by its velocity, horizontal pass before vertical pass
pub fn move_and_collide(body: &mut Body, obstacles: &[Rect]) -> Contact {
    let mut contact = Contact::default();

    body.pos.x += body.vel.x;
    resolve_horizontal(body, obstacles, &mut contact);

    // Grounded is only ever set by a landing in this pass
    contact.grounded = false;
    body.pos.y += body.vel.y;
    resolve_vertical(body, obstacles, &mut contact);

    contact
}

/// Keep the body inside the level. Returns true if the bottom bound acted as
/// a floor this step.
pub fn clamp_to_bounds(body: &mut Body, bounds: &LevelBounds) -> bool {
    if body.pos.x < bounds.left {
        body.pos.x = bounds.left;
        body.vel.x = 0.0;
    }
    if body.pos.x + body.size.x > bounds.right {
        body.pos.x = bounds.right - body.size.x;
        body.vel.x = 0.0;
    }
    if body.pos.y + body.size.y > bounds.bottom {
        body.pos.y = bounds.bottom - body.size.y;
        body.vel.y = 0.0;
        return true;
    }
    false
}
