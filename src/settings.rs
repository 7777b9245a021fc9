//! Generation settings
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while reading a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Parameters for one generation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Number of buildings to generate
    pub building_count: u32,
    /// RNG seed; `None` derives one from the clock
    pub seed: Option<u64>,
    /// Buildings are placed in [0, area_extent) on X and Z
    pub area_extent: i32,
    /// Height of one layer
    pub layer_height: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            building_count: DEFAULT_BUILDING_COUNT,
            seed: None,
            area_extent: DEFAULT_AREA_EXTENT,
            layer_height: DEFAULT_LAYER_HEIGHT,
        }
    }
}

impl GenerationSettings {
    /// Settings with a fixed seed and the default building count
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the generator cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.area_extent <= 0 {
            return Err(SettingsError::Invalid {
                field: "area_extent",
                reason: format!("must be positive, got {}", self.area_extent),
            });
        }
        if !self.layer_height.is_finite() || self.layer_height <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "layer_height",
                reason: format!("must be a positive finite number, got {}", self.layer_height),
            });
        }
        // Spawn jitter must never reach the lowest drop height
        if self.layer_height * SPAWN_BASE_LAYERS <= SPAWN_JITTER {
            return Err(SettingsError::Invalid {
                field: "layer_height",
                reason: format!(
                    "must exceed {} so blocks spawn above their targets, got {}",
                    SPAWN_JITTER / SPAWN_BASE_LAYERS,
                    self.layer_height
                ),
            });
        }
        Ok(())
    }

    /// The configured seed, or one derived from the wall clock
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
