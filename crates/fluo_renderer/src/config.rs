//! Render parameters.
//!
//! Parameters arrive from whatever loads the scene; they can be built in code
//! or deserialized from JSON. Missing JSON fields take their defaults.

use crate::material::Color;
use fluo_math::Interval;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in render parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    NoSamples,

    #[error("gamma correction must be positive and finite, got {0}")]
    InvalidGamma(f64),

    #[error("ray range [{t_min}, {t_max}] is empty or negative")]
    InvalidRange { t_min: f64, t_max: f64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub image_width: u32,
    /// Output image height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Bounces allowed before a path returns the background
    pub max_bounces: u32,
    /// Gamma; pixels are encoded as `color^(1/gamma_correction)`
    pub gamma_correction: f64,
    /// Nearest accepted hit distance (keeps scattered rays off their own surface)
    pub t_min: f64,
    /// Farthest accepted hit distance
    pub t_max: f64,
    /// Color returned when a ray escapes or a path is cut off
    pub background: Color,
    /// Base seed for the per-row random streams; random when absent
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            samples_per_pixel: 100,
            max_bounces: 50,
            gamma_correction: 2.0,
            t_min: 1e-4,
            t_max: f64::MAX,
            background: Color::ZERO,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters before a render starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ConfigError::ZeroDimensions {
                width: self.image_width,
                height: self.image_height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::NoSamples);
        }
        if !(self.gamma_correction.is_finite() && self.gamma_correction > 0.0) {
            return Err(ConfigError::InvalidGamma(self.gamma_correction));
        }
        // Written so NaN bounds fail too
        if !(self.t_min >= 0.0 && self.t_min < self.t_max) {
            return Err(ConfigError::InvalidRange {
                t_min: self.t_min,
                t_max: self.t_max,
            });
        }
        Ok(())
    }

    /// The accepted hit range `[t_min, t_max]`.
    pub fn ray_interval(&self) -> Interval {
        Interval::new(self.t_min, self.t_max)
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = RenderConfig::from_json_str(
            r#"{ "image_width": 64, "image_height": 32, "background": [0.1, 0.2, 0.3], "seed": 9 }"#,
        )
        .unwrap();

        assert_eq!(config.image_width, 64);
        assert_eq!(config.image_height, 32);
        assert_eq!(config.background, Color::new(0.1, 0.2, 0.3));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.samples_per_pixel, RenderConfig::default().samples_per_pixel);
        assert_eq!(config.pixel_count(), 64 * 32);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "image_width": 0 }"#),
            Err(ConfigError::ZeroDimensions { width: 0, .. })
        ));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "gamma_correction": 0.0 }"#),
            Err(ConfigError::InvalidGamma(_))
        ));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{ "image_width": "wide" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_range_and_samples() {
        let config = RenderConfig {
            t_min: 5.0,
            t_max: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange { .. })));

        let config = RenderConfig {
            t_min: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoSamples)));
    }
}
