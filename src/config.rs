//! Configuration types for the weather widget.
//!
//! All values are fixed at construction time. A complete [`WidgetConfig`]
//! can be saved to and loaded from JSON; every field has a default so a
//! partial file only needs to name what it changes.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::card::WeatherCard;
use crate::error::ConfigError;

/// Tuning for the rain particle layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RainConfig {
    /// Drops per 10,000 square units of surface area.
    pub drops_per_10k_pixels: f32,
    /// Overall fall speed multiplier.
    pub global_fall_speed: f32,
    /// Streak length before depth scaling, in surface units.
    pub base_drop_length: f32,
    /// Streak thickness before depth scaling.
    pub base_drop_thickness: f32,
    /// Opacity of the farthest drops.
    pub far_opacity: f32,
    /// Opacity of the nearest drops.
    pub near_opacity: f32,
    /// Relative size change (per dimension) above which the field is reseeded.
    pub rebuild_threshold: f32,
    /// Lower bound on the number of drops regardless of area.
    pub min_drop_count: usize,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            drops_per_10k_pixels: 22.0,
            global_fall_speed: 1.0,
            base_drop_length: 14.0,
            base_drop_thickness: 1.2,
            far_opacity: 0.18,
            near_opacity: 0.55,
            rebuild_threshold: 0.2,
            min_drop_count: 40,
        }
    }
}

impl RainConfig {
    /// Dense, slow, faint drizzle used behind the full-screen card.
    pub fn drizzle() -> Self {
        Self {
            drops_per_10k_pixels: 80.0,
            global_fall_speed: 0.2,
            base_drop_length: 8.0,
            base_drop_thickness: 0.75,
            far_opacity: 0.2,
            near_opacity: 0.3,
            ..Self::default()
        }
    }

    /// Steady rain used behind stacked cards.
    pub fn shower() -> Self {
        Self {
            drops_per_10k_pixels: 60.0,
            global_fall_speed: 1.2,
            base_drop_length: 10.0,
            base_drop_thickness: 0.75,
            far_opacity: 0.2,
            near_opacity: 0.3,
            ..Self::default()
        }
    }

    pub fn with_density(mut self, drops_per_10k_pixels: f32) -> Self {
        self.drops_per_10k_pixels = drops_per_10k_pixels;
        self
    }

    pub fn with_fall_speed(mut self, speed: f32) -> Self {
        self.global_fall_speed = speed;
        self
    }

    pub fn with_drop_length(mut self, length: f32) -> Self {
        self.base_drop_length = length;
        self
    }

    pub fn with_drop_thickness(mut self, thickness: f32) -> Self {
        self.base_drop_thickness = thickness;
        self
    }

    /// Set the far/near opacity range.
    pub fn with_opacity(mut self, far: f32, near: f32) -> Self {
        self.far_opacity = far;
        self.near_opacity = near;
        self
    }
}

/// Tuning for the tilt damping filter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// How fast the accumulated tilt decays back to zero. Higher is snappier.
    pub decay_hz: f32,
    /// Elapsed time assumed for the first sample of a feed, in seconds.
    pub sample_interval: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            decay_hz: 1.5,
            sample_interval: 1.0 / 60.0,
        }
    }
}

/// Pixel offset per unit of damped tilt, per visual layer.
///
/// The defaults pair with [`RainConfig::drizzle`]: the rain moves twice as
/// far as the card background, so it reads as the nearer layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Card background gradient.
    pub background: f32,
    /// Rain streaks.
    pub rain: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            background: 20.0,
            rain: 40.0,
        }
    }
}

/// Background colours of a card, linear RGB in 0..1.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardStyle {
    pub top: Vec3,
    pub bottom: Vec3,
    /// Streak colour.
    pub rain: Vec3,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            top: Vec3::new(0.29, 0.36, 0.47),
            bottom: Vec3::new(0.11, 0.14, 0.21),
            rain: Vec3::ONE,
        }
    }
}

/// Complete widget configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub rain: RainConfig,
    pub motion: MotionConfig,
    pub parallax: ParallaxConfig,
    pub cards: Vec<WeatherCard>,
    /// Card size in logical pixels.
    pub card_width: f32,
    pub card_height: f32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            rain: RainConfig::drizzle(),
            motion: MotionConfig::default(),
            parallax: ParallaxConfig::default(),
            cards: vec![WeatherCard::london()],
            card_width: 300.0,
            card_height: 400.0,
        }
    }
}

impl WidgetConfig {
    pub fn with_rain(mut self, rain: RainConfig) -> Self {
        self.rain = rain;
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_parallax(mut self, parallax: ParallaxConfig) -> Self {
        self.parallax = parallax;
        self
    }

    pub fn with_card(mut self, card: WeatherCard) -> Self {
        self.cards.push(card);
        self
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }
}
