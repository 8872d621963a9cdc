use figure::{Rect, DEFAULT_EXTENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("`{field}` must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Tunables for a [`crate::Canvas`]. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Rect of the root figure of a new drawing.
    pub drawing_extent: Rect,
    /// Side length of resize handles, in screen pixels.
    pub resize_handle_size: f64,
    /// Side length of delete and edit handles, in screen pixels.
    pub action_handle_size: f64,
    /// Wheel zoom factor when scrolling up.
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            drawing_extent: DEFAULT_EXTENT,
            resize_handle_size: 15.0,
            action_handle_size: 16.0,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Handle sizes and zoom factors must be finite and greater than zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("resize_handle_size", self.resize_handle_size),
            ("action_handle_size", self.action_handle_size),
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    /// Zoom factor for a wheel step: negative deltas zoom in.
    pub fn zoom_factor(&self, delta: f64) -> f64 {
        if delta < 0.0 {
            self.zoom_in_factor
        } else {
            self.zoom_out_factor
        }
    }
}
