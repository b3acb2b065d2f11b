//! Scene settings
//!
//! Every tunable of the balloon scene. Loaded from a JSON file when one is
//! given, otherwise the empirical defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// Viewport size in points (width, height)
    pub viewport: (f32, f32),
    /// Balloons spawn this far below (positive) or above (negative) the viewport center
    pub spawn_offset_y: f32,
    /// Fan-out radius is the viewport width divided by this
    pub fan_out_divisor: f32,
    /// Number of spots on the ring
    pub balloon_count: usize,

    // === Timing (seconds) ===
    /// Grace period before the first shuffle, and the period after it
    pub shuffle_interval: f32,
    /// How long the black hole runs before the balloons are cleared
    pub escape_finale_delay: f32,

    // === Spots (fixed once the ring is built) ===
    pub spot_field_strength: f32,
    pub spot_field_region_radius: f32,
    pub spot_field_smoothness: f32,
    pub spot_resistance: f32,
    pub spot_density: f32,

    // === Escape fields ===
    pub fly_away_gravity: (f32, f32),
    pub vortex_strength: f32,
    pub vortex_min_radius: f32,
    pub black_hole_strength: f32,
    pub black_hole_min_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: (390.0, 844.0),
            spawn_offset_y: -15.0,
            fan_out_divisor: 2.5,
            balloon_count: 8,

            shuffle_interval: SHUFFLE_INTERVAL,
            escape_finale_delay: ESCAPE_FINALE_DELAY,

            spot_field_strength: SPOT_FIELD_STRENGTH,
            spot_field_region_radius: SPOT_FIELD_REGION_RADIUS,
            spot_field_smoothness: SPOT_FIELD_SMOOTHNESS,
            spot_resistance: SPOT_RESISTANCE,
            spot_density: SPOT_DENSITY,

            fly_away_gravity: FLY_AWAY_GRAVITY,
            vortex_strength: VORTEX_STRENGTH,
            vortex_min_radius: VORTEX_MIN_RADIUS,
            black_hole_strength: BLACK_HOLE_STRENGTH,
            black_hole_min_radius: BLACK_HOLE_MIN_RADIUS,
        }
    }
}

impl Settings {
    /// Ring radius for the configured viewport
    pub fn fan_out_radius(&self) -> f32 {
        self.viewport.0 / self.fan_out_divisor
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Bad settings in {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "balloon_count": 3, "shuffle_interval": 1.5 }"#)
            .unwrap();
        assert_eq!(settings.balloon_count, 3);
        assert_eq!(settings.shuffle_interval, 1.5);
        assert_eq!(settings.viewport, Settings::default().viewport);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            viewport: (800.0, 600.0),
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/balloon-spots.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_fan_out_radius() {
        assert!((Settings::default().fan_out_radius() - 156.0).abs() < 1e-4);
    }
}
