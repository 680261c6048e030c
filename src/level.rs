//! Level documents and templates
//!
//! A level document is JSON holding an ordered list of levels. Parsing is
//! lenient about missing fields, and anything that fails to parse falls back
//! to a single built-in level. Templates are read-only; every level load
//! instantiates fresh entities from one.

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::sim::Rect;
use crate::tuning::Tuning;

/// Where the player starts when a level does not say
pub const DEFAULT_START: Vec2 = Vec2::new(100.0, 100.0);
/// Platform size when a platform entry omits one
pub const DEFAULT_PLATFORM_SIZE: Vec2 = Vec2::new(200.0, 20.0);

/// Why a level document was rejected
#[derive(Debug, Error)]
pub enum LevelDataError {
    #[error("level document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level document contains no levels")]
    Empty,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointData {
    pub x: f32,
    pub y: f32,
}

impl From<PointData> for Vec2 {
    fn from(p: PointData) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SizeData {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformData {
    pub position: PointData,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub size: Option<SizeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectibleData {
    pub position: PointData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardData {
    pub position: PointData,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub move_distance: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

/// One level as written in the document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub platforms: Vec<PlatformData>,
    #[serde(default, alias = "apples")]
    pub collectibles: Vec<CollectibleData>,
    #[serde(default, alias = "enemies")]
    pub hazards: Vec<HazardData>,
    #[serde(default, alias = "playerStart")]
    pub start_position: Option<PointData>,
    #[serde(default)]
    pub respawn_position: Option<PointData>,
    #[serde(default, alias = "requiredApples")]
    pub required_collectibles: Option<usize>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LevelDocument {
    #[serde(default)]
    pub levels: Vec<LevelData>,
}

/// Hazard placement in a template
#[derive(Debug, Clone, PartialEq)]
pub struct HazardSpawn {
    /// Top-left of the body
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub move_distance: f32,
}

/// A validated, read-only level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTemplate {
    pub name: String,
    pub platforms: Vec<Rect>,
    pub collectibles: Vec<Vec2>,
    pub hazards: Vec<HazardSpawn>,
    pub start_position: Vec2,
    pub respawn_position: Vec2,
    pub required_collectibles: usize,
    pub width: f32,
    pub height: f32,
    pub background: Option<String>,
}

/// Replace a non-positive or non-finite dimension with `fallback`
fn positive_or(value: Option<f32>, fallback: f32, what: &str) -> f32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!("Invalid {} {}, using {}", what, v, fallback);
            fallback
        }
        None => fallback,
    }
}

/// Collectibles needed to finish a level holding `count` of them
pub fn required_for(count: usize, explicit: Option<usize>, fraction: f64) -> usize {
    let required = match explicit {
        Some(n) => n,
        // Small bias keeps e.g. 10 * 0.7 from ceiling to 8
        None => (count as f64 * fraction - 1e-9).ceil().max(0.0) as usize,
    };
    if required > count {
        log::warn!(
            "Level requires {} collectibles but only has {}, clamping",
            required,
            count
        );
        return count;
    }
    required
}

impl LevelTemplate {
    pub fn from_data(index: usize, data: &LevelData, tuning: &Tuning) -> Self {
        let platforms = data
            .platforms
            .iter()
            .map(|p| {
                let (w, h) = match p.size {
                    Some(size) => (Some(size.width), Some(size.height)),
                    None => (p.width, p.height),
                };
                Rect::new(
                    p.position.x,
                    p.position.y,
                    positive_or(w, DEFAULT_PLATFORM_SIZE.x, "platform width"),
                    positive_or(h, DEFAULT_PLATFORM_SIZE.y, "platform height"),
                )
            })
            .collect();

        let collectibles: Vec<Vec2> = data.collectibles.iter().map(|c| c.position.into()).collect();

        let hazard_tuning = &tuning.hazard;
        let hazards = data
            .hazards
            .iter()
            .map(|h| {
                let size = Vec2::new(
                    positive_or(h.width, hazard_tuning.width, "hazard width"),
                    positive_or(h.height, hazard_tuning.height, "hazard height"),
                );
                // The document gives the foot point; the body stands on it
                let pos = Vec2::new(
                    h.position.x,
                    h.position.y - size.y + hazard_tuning.foot_offset,
                );
                HazardSpawn {
                    pos,
                    size,
                    speed: positive_or(h.speed, hazard_tuning.speed, "hazard speed"),
                    move_distance: h
                        .move_distance
                        .filter(|d| d.is_finite() && *d >= 0.0)
                        .unwrap_or(hazard_tuning.move_distance),
                }
            })
            .collect();

        let start_position = data.start_position.map(Vec2::from).unwrap_or(DEFAULT_START);
        let respawn_position = data
            .respawn_position
            .map(Vec2::from)
            .unwrap_or(start_position);

        Self {
            name: data
                .name
                .clone()
                .unwrap_or_else(|| format!("Level {}", index + 1)),
            platforms,
            required_collectibles: required_for(
                collectibles.len(),
                data.required_collectibles,
                tuning.world.required_fraction,
            ),
            collectibles,
            hazards,
            start_position,
            respawn_position,
            width: positive_or(data.width, tuning.world.level_width, "level width"),
            height: positive_or(data.height, tuning.world.level_height, "level height"),
            background: data.background.clone(),
        }
    }

    /// The built-in level used when no usable data exists
    pub fn fallback(tuning: &Tuning) -> Self {
        let data = LevelData {
            name: Some("Level 1".to_string()),
            platforms: vec![PlatformData {
                position: PointData { x: 0.0, y: 500.0 },
                width: Some(800.0),
                height: Some(100.0),
                size: None,
            }],
            collectibles: vec![CollectibleData {
                position: PointData { x: 300.0, y: 400.0 },
            }],
            start_position: Some(PointData { x: 100.0, y: 300.0 }),
            ..Default::default()
        };
        Self::from_data(0, &data, tuning)
    }
}

/// The ordered, non-empty list of level templates
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<LevelTemplate>,
}

impl LevelSet {
    /// Parse a level document
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, LevelDataError> {
        let doc: LevelDocument = serde_json::from_str(json)?;
        Self::from_document(&doc, tuning)
    }

    pub fn from_document(doc: &LevelDocument, tuning: &Tuning) -> Result<Self, LevelDataError> {
        if doc.levels.is_empty() {
            return Err(LevelDataError::Empty);
        }
        let levels = doc
            .levels
            .iter()
            .enumerate()
            .map(|(i, data)| LevelTemplate::from_data(i, data, tuning))
            .collect();
        Ok(Self { levels })
    }

    /// Parse `json` if given, otherwise or on failure use the fallback level
    pub fn load_or_default(json: Option<&str>, tuning: &Tuning) -> Self {
        let Some(json) = json else {
            log::warn!("No level data, using the built-in level");
            return Self::fallback(tuning);
        };
        match Self::from_json(json, tuning) {
            Ok(set) => {
                log::info!("Loaded {} levels", set.len());
                set
            }
            Err(e) => {
                log::warn!("{}; using the built-in level", e);
                Self::fallback(tuning)
            }
        }
    }

    pub fn fallback(tuning: &Tuning) -> Self {
        Self {
            levels: vec![LevelTemplate::fallback(tuning)],
        }
    }

    pub fn get(&self, index: usize) -> Option<&LevelTemplate> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Never true for a parsed set
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelTemplate> {
        self.levels.iter()
    }
}
