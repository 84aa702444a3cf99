//! Parallax offsets for the card's layers.

use glam::Vec2;

use crate::config::ParallaxConfig;
use crate::motion::DampedMotion;

/// A layer that shifts with device tilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParallaxLayer {
    /// Card background gradient.
    Background,
    /// The rain streaks drawn over it.
    Rain,
}

impl ParallaxLayer {
    /// Pixels of offset per unit of damped tilt.
    pub fn multiplier(self, config: &ParallaxConfig) -> f32 {
        match self {
            ParallaxLayer::Background => config.background,
            ParallaxLayer::Rain => config.rain,
        }
    }

    /// Pixel offset for this layer. Roll moves x, pitch moves y.
    pub fn offset(self, motion: DampedMotion, config: &ParallaxConfig) -> Vec2 {
        motion.as_vec2() * self.multiplier(config)
    }
}

/// Offsets for every layer, computed once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxOffsets {
    pub background: Vec2,
    pub rain: Vec2,
}

impl ParallaxOffsets {
    pub fn new(motion: DampedMotion, config: &ParallaxConfig) -> Self {
        Self {
            background: ParallaxLayer::Background.offset(motion, config),
            rain: ParallaxLayer::Rain.offset(motion, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_is_x_pitch_is_y() {
        let motion = DampedMotion { pitch: 0.5, roll: -0.25 };
        let offset = ParallaxLayer::Rain.offset(motion, &ParallaxConfig::default());
        assert_eq!(offset, Vec2::new(-10.0, 20.0));
    }

    #[test]
    fn test_zero_motion_zero_offsets() {
        let offsets = ParallaxOffsets::new(DampedMotion::default(), &ParallaxConfig::default());
        assert_eq!(offsets, ParallaxOffsets::default());
    }

    #[test]
    fn test_rain_moves_more_than_background() {
        let motion = DampedMotion { pitch: 0.1, roll: 0.1 };
        let offsets = ParallaxOffsets::new(motion, &ParallaxConfig::default());
        assert!(offsets.rain.length() > offsets.background.length());
    }
}
