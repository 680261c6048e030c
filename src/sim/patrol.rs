//! Patrolling hazards
//!
//! A hazard seeks one of two waypoints in a straight line (no gravity) and
//! turns around when it gets there or when a move would put it inside a
//! platform. A step-counted cooldown keeps it from flipping back and forth on
//! consecutive steps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Facing, Rect};
use super::collision::overlaps_any;

/// Which waypoint a hazard is heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waypoint {
    A,
    B,
}

impl Waypoint {
    pub fn other(self) -> Self {
        match self {
            Waypoint::A => Waypoint::B,
            Waypoint::B => Waypoint::A,
        }
    }
}

/// What a patrol step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolOutcome {
    /// Moved toward the current target
    Advanced,
    /// Reached the target and turned around
    Reversed,
    /// The move hit a platform and was rolled back
    Blocked { reversed: bool },
    /// Sitting exactly on the target while the cooldown runs
    Holding,
}

/// A hazard pacing between two waypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub body: Body,
    pub speed: f32,
    pub point_a: Vec2,
    pub point_b: Vec2,
    pub target: Waypoint,
    /// Steps since the last target flip
    pub direction_change_timer: u32,
    pub direction_change_cooldown: u32,
}

impl Hazard {
    /// Build a hazard patrolling `move_distance` either side of `pos`.
    /// Heads for `point_b` first.
    pub fn new(pos: Vec2, size: Vec2, speed: f32, move_distance: f32, cooldown: u32) -> Self {
        Self {
            body: Body::new(pos, size),
            speed,
            point_a: Vec2::new(pos.x - move_distance, pos.y),
            point_b: Vec2::new(pos.x + move_distance, pos.y),
            target: Waypoint::B,
            direction_change_timer: 0,
            direction_change_cooldown: cooldown,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn current_target(&self) -> Vec2 {
        match self.target {
            Waypoint::A => self.point_a,
            Waypoint::B => self.point_b,
        }
    }

    pub fn facing(&self) -> Facing {
        match self.target {
            Waypoint::A => Facing::Left,
            Waypoint::B => Facing::Right,
        }
    }

    #[inline]
    fn cooldown_elapsed(&self) -> bool {
        self.direction_change_timer >= self.direction_change_cooldown
    }

    fn flip_target(&mut self) {
        self.target = self.target.other();
        self.direction_change_timer = 0;
    }

    /// Advance one step against the static obstacles
    pub fn update(&mut self, obstacles: &[Rect]) -> PatrolOutcome {
        self.direction_change_timer = self.direction_change_timer.saturating_add(1);

        let to_target = self.current_target() - self.body.pos;
        let distance = to_target.length();

        if distance < self.speed && self.cooldown_elapsed() {
            self.flip_target();
            self.body.vel = Vec2::ZERO;
            return PatrolOutcome::Reversed;
        }

        // Zero distance has no direction; wait on the target for the cooldown
        let Some(direction) = to_target.try_normalize() else {
            self.body.vel = Vec2::ZERO;
            return PatrolOutcome::Holding;
        };

        let previous = self.body.pos;
        self.body.vel = direction * self.speed;
        self.body.pos += self.body.vel;

        if overlaps_any(&self.body.rect(), obstacles) {
            // Full rollback, not per axis
            self.body.pos = previous;
            self.body.vel = Vec2::ZERO;
            let reversed = self.cooldown_elapsed();
            if reversed {
                self.flip_target();
            }
            return PatrolOutcome::Blocked { reversed };
        }

        PatrolOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hazard(cooldown: u32) -> Hazard {
        Hazard::new(
            Vec2::new(200.0, 100.0),
            Vec2::new(40.0, 60.0),
            2.0,
            100.0,
            cooldown,
        )
    }

    #[test]
    fn test_waypoints_either_side() {
        let h = hazard(30);
        assert_eq!(h.point_a, Vec2::new(100.0, 100.0));
        assert_eq!(h.point_b, Vec2::new(300.0, 100.0));
        assert_eq!(h.target, Waypoint::B);
        assert_eq!(h.facing(), Facing::Right);
    }

    #[test]
    fn test_advances_toward_target() {
        let mut h = hazard(30);
        assert_eq!(h.update(&[]), PatrolOutcome::Advanced);
        assert_eq!(h.body.pos, Vec2::new(202.0, 100.0));
        assert_eq!(h.direction_change_timer, 1);
    }

    #[test]
    fn test_reverses_at_target_after_cooldown() {
        let mut h = hazard(30);
        // 50 steps of 2 units reach point_b exactly
        for _ in 0..50 {
            h.update(&[]);
        }
        assert_eq!(h.body.pos, h.point_b);
        assert_eq!(h.update(&[]), PatrolOutcome::Reversed);
        assert_eq!(h.target, Waypoint::A);
        assert_eq!(h.direction_change_timer, 0);
        assert_eq!(h.facing(), Facing::Left);
    }

    #[test]
    fn test_no_reversal_before_cooldown() {
        let cooldown = 10;
        let mut h = hazard(cooldown);
        h.body.pos = h.point_b - Vec2::new(1.0, 0.0);

        // Within reach from the first step, but the cooldown has not elapsed
        for _ in 0..cooldown - 1 {
            assert_ne!(h.update(&[]), PatrolOutcome::Reversed);
            assert_eq!(h.target, Waypoint::B);
        }
        // The cooldown-th step flips as soon as the target is within reach
        let mut flipped = false;
        for _ in 0..4 {
            if h.update(&[]) == PatrolOutcome::Reversed {
                flipped = true;
                break;
            }
        }
        assert!(flipped);
        assert_eq!(h.target, Waypoint::A);
    }

    #[test]
    fn test_zero_distance_holds_without_nan() {
        let mut h = hazard(30);
        h.body.pos = h.point_b;
        assert_eq!(h.update(&[]), PatrolOutcome::Holding);
        assert_eq!(h.body.pos, h.point_b);
        assert!(h.body.pos.is_finite());
    }

    #[test]
    fn test_blocked_move_rolls_back() {
        let mut h = hazard(30);
        // Wall just right of the hazard
        let wall = Rect::new(241.0, 0.0, 20.0, 400.0);
        let outcome = h.update(&[wall]);
        assert_eq!(outcome, PatrolOutcome::Blocked { reversed: false });
        assert_eq!(h.body.pos, Vec2::new(200.0, 100.0));
        assert_eq!(h.target, Waypoint::B);
    }

    #[test]
    fn test_blocked_move_reverses_after_cooldown() {
        let mut h = hazard(3);
        let wall = Rect::new(241.0, 0.0, 20.0, 400.0);
        h.update(&[wall]);
        h.update(&[wall]);
        let outcome = h.update(&[wall]);
        assert_eq!(outcome, PatrolOutcome::Blocked { reversed: true });
        assert_eq!(h.target, Waypoint::A);

        // Now walks away from the wall
        assert_eq!(h.update(&[wall]), PatrolOutcome::Advanced);
        assert_eq!(h.body.pos.x, 198.0);
    }
}
