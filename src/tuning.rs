//! Data-driven gameplay constants
//!
//! Every entity is built from one of these explicit structs instead of ad-hoc
//! defaults. All fields have serde defaults so a partial JSON override works.

use serde::{Deserialize, Serialize};

/// Player integration constants (units per step)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration added to vertical velocity every step
    pub gravity: f32,
    /// Horizontal speed while a move intent is held
    pub move_speed: f32,
    /// Vertical velocity set on jump (negative is up)
    pub jump_force: f32,
    /// Steps after a jump before another jump may trigger
    pub jump_cooldown_steps: u32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            move_speed: 5.0,
            jump_force: -20.0,
            jump_cooldown_steps: crate::ms_to_steps(100.0),
        }
    }
}

/// Player body dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        // 50x37 sprite drawn at scale 2
        Self {
            width: 100.0,
            height: 74.0,
        }
    }
}

/// Patrolling hazard defaults (used when the level omits a field)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub width: f32,
    pub height: f32,
    /// Units moved per step along the waypoint direction
    pub speed: f32,
    /// Distance from the spawn point to each waypoint
    pub move_distance: f32,
    /// Steps that must pass between two target flips
    pub direction_change_cooldown: u32,
    /// How far the body sinks below the spawn foot point
    pub foot_offset: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 60.0,
            speed: 2.0,
            move_distance: 100.0,
            direction_change_cooldown: 30,
            foot_offset: 0.0,
        }
    }
}

/// Collectible constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleTuning {
    /// Edge length of the square pickup box
    pub size: f32,
    /// Score awarded per pickup
    pub points: u64,
    /// Cosmetic fade-out length after collection
    pub fade_steps: u32,
}

impl Default for CollectibleTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            points: 10,
            fade_steps: 10,
        }
    }
}

/// Level geometry defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub level_width: f32,
    pub level_height: f32,
    /// Visible width used by the follow camera
    pub viewport_width: f32,
    /// Share of collectibles required when a level does not say
    pub required_fraction: f64,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            level_width: 1600.0,
            level_height: 600.0,
            viewport_width: 800.0,
            required_fraction: 0.7,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub hazard: HazardTuning,
    pub collectible: CollectibleTuning,
    pub world: WorldTuning,
}

impl Tuning {
    /// Parse a tuning override, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning override: {}", e);
                Self::default()
            }
        }
    }

    /// Replace sizes and extents that are not strictly positive with defaults
    pub fn sanitized(mut self) -> Self {
        let player = PlayerTuning::default();
        positive_or_default(&mut self.player.width, player.width, "player width");
        positive_or_default(&mut self.player.height, player.height, "player height");

        let hazard = HazardTuning::default();
        positive_or_default(&mut self.hazard.width, hazard.width, "hazard width");
        positive_or_default(&mut self.hazard.height, hazard.height, "hazard height");
        positive_or_default(&mut self.hazard.speed, hazard.speed, "hazard speed");

        let collectible = CollectibleTuning::default();
        positive_or_default(&mut self.collectible.size, collectible.size, "collectible size");

        let world = WorldTuning::default();
        positive_or_default(&mut self.world.level_width, world.level_width, "level width");
        positive_or_default(&mut self.world.level_height, world.level_height, "level height");
        positive_or_default(
            &mut self.world.viewport_width,
            world.viewport_width,
            "viewport width",
        );
        self
    }
}

fn positive_or_default(value: &mut f32, default: f32, what: &str) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!("Invalid tuning {} {}, using {}", what, value, default);
        *value = default;
    }
}
