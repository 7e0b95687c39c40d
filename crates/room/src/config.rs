use std::path::{Path, PathBuf};

use roomscene_navigation::NavigationConfig;
use roomscene_surface::DEFAULT_SAMPLES;
use serde::{Deserialize, Serialize};

use crate::flame::FlameSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Room layout and camera settings. Every field has a default, so an empty
/// or partial YAML document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub floor_width: f32,
    pub floor_length: f32,
    pub wall_height: f32,
    pub table: TableLayout,
    pub plate_radius: f32,
    pub plate_thickness: f32,
    pub cake_radius: f32,
    pub cake_height: f32,
    pub candle_height: f32,
    pub candle_radius: f32,
    /// Samples per axis for the blanket and newspaper surfaces.
    pub surface_samples: usize,
    pub flame: FlameSettings,
    pub navigation: NavigationConfig,
    /// Directory texture and model paths are resolved against.
    pub asset_root: PathBuf,
}

/// Table dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub width: f32,
    pub length: f32,
    pub thickness: f32,
    pub leg_height: f32,
    pub leg_radius: f32,
    /// Gap between the table edge and the walls of its corner.
    pub corner_margin: f32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            width: 3.5,
            length: 3.5,
            thickness: 0.2,
            leg_height: 2.9,
            leg_radius: 0.1,
            corner_margin: 0.5,
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            floor_width: 15.0,
            floor_length: 15.0,
            wall_height: 10.0,
            table: TableLayout::default(),
            plate_radius: 0.8,
            plate_thickness: 0.075,
            cake_radius: 0.5,
            cake_height: 0.25,
            candle_height: 0.2,
            candle_radius: 0.015,
            surface_samples: DEFAULT_SAMPLES,
            flame: FlameSettings::default(),
            navigation: NavigationConfig::default(),
            asset_root: PathBuf::from("assets"),
        }
    }
}

impl RoomConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "room config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
