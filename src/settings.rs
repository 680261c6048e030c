//! Game settings and preferences
//!
//! Persisted separately from progress, through the same storage backend.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Player-facing preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Level overview strip at the top of the screen
    pub show_minimap: bool,

    // === Accessibility ===
    /// Skip the collection fade
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_minimap: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "apple_knight_settings";

    /// Effective fade length for collected items
    pub fn fade_steps(&self, configured: u32) -> u32 {
        if self.reduced_motion { 0 } else { configured }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings, using defaults: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        let result = serde_json::to_string(self)
            .map_err(StorageError::from)
            .and_then(|json| store.set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::error!("Failed to save settings: {}", e),
        }
    }
}
