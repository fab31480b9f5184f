//! Tunable canvas parameters and the category → initial placement table.
//!
//! `CanvasConfig::default()` carries the built-in values. Hosts that want a
//! different layout can ship a JSON document; every field is optional and
//! falls back to its default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::{
    MOVEMENT_THRESHOLD_PX, POSITION_MARGIN_PERCENT, SCALE_MAX, SCALE_MIN, SNAP_ANGLES, SNAP_THRESHOLD_DEG,
};

/// Error returned when loading or validating a [`CanvasConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the config shape.
    #[error("failed to parse canvas config: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but a value is out of range.
    #[error("invalid canvas config: {0}")]
    Invalid(String),
}

/// Where a freshly selected item is centered, in percent of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x_percent: f64,
    pub y_percent: f64,
}

impl Placement {
    #[must_use]
    pub fn new(x_percent: f64, y_percent: f64) -> Self {
        Self { x_percent, y_percent }
    }
}

/// Every tunable used by the store and the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Rotation snap targets in degrees, checked in order.
    pub snap_angles: Vec<f64>,
    /// Snap tolerance in degrees.
    pub snap_threshold_deg: f64,
    /// Pointer travel (px) before an already-straight item starts rotating.
    pub movement_threshold_px: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    /// Edge margin for item centers, in percent.
    pub margin_percent: f64,
    /// Initial placement by item category.
    pub placements: HashMap<String, Placement>,
    /// Placement for items whose category is unknown or missing.
    pub default_placement: Placement,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            snap_angles: SNAP_ANGLES.to_vec(),
            snap_threshold_deg: SNAP_THRESHOLD_DEG,
            movement_threshold_px: MOVEMENT_THRESHOLD_PX,
            scale_min: SCALE_MIN,
            scale_max: SCALE_MAX,
            margin_percent: POSITION_MARGIN_PERCENT,
            placements: default_placements(),
            default_placement: Placement::new(50.0, 50.0),
        }
    }
}

fn default_placements() -> HashMap<String, Placement> {
    [
        ("tops", Placement::new(50.0, 30.0)),
        ("outerwear", Placement::new(30.0, 30.0)),
        ("onepiece", Placement::new(50.0, 45.0)),
        ("bottoms", Placement::new(50.0, 65.0)),
        ("shoes", Placement::new(50.0, 85.0)),
        ("bags", Placement::new(75.0, 60.0)),
        ("accessories", Placement::new(75.0, 20.0)),
        ("hats", Placement::new(25.0, 12.0)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl CanvasConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the engine cannot honor (inverted or non-finite limits).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale_min.is_finite() && self.scale_max.is_finite()) || self.scale_min <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale limits must be finite and positive, got [{}, {}]",
                self.scale_min, self.scale_max
            )));
        }
        if self.scale_min > self.scale_max {
            return Err(ConfigError::Invalid(format!(
                "scale_min {} exceeds scale_max {}",
                self.scale_min, self.scale_max
            )));
        }
        if !(0.0..50.0).contains(&self.margin_percent) {
            return Err(ConfigError::Invalid(format!(
                "margin_percent must be in [0, 50), got {}",
                self.margin_percent
            )));
        }
        if !self.snap_threshold_deg.is_finite() || self.snap_threshold_deg < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold_deg must be a non-negative number, got {}",
                self.snap_threshold_deg
            )));
        }
        if !self.movement_threshold_px.is_finite() || self.movement_threshold_px < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "movement_threshold_px must be a non-negative number, got {}",
                self.movement_threshold_px
            )));
        }
        if self.snap_angles.iter().any(|a| !a.is_finite()) {
            return Err(ConfigError::Invalid("snap_angles must be finite".into()));
        }
        Ok(())
    }

    /// Initial placement for a category, falling back to `default_placement`.
    #[must_use]
    pub fn placement_for(&self, category: Option<&str>) -> Placement {
        category
            .and_then(|c| self.placements.get(c))
            .copied()
            .unwrap_or(self.default_placement)
    }
}
