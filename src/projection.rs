//! Projection of drops into drawable streaks.
//!
//! A drop becomes a short vertical segment in pixel space whose length,
//! thickness and peak opacity grow with depth. Opacity fades from zero at
//! the head (top) to the peak at the tail (bottom). Drops outside a margin
//! around the surface are culled here but stay in the simulation.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::config::RainConfig;
use crate::rain::{lerp, Raindrop, SurfaceSize};

/// Drops further than this outside the surface are not drawn.
pub const CULL_MARGIN_X: f32 = 40.0;
pub const CULL_MARGIN_Y: f32 = 60.0;

const LENGTH_FAR: f32 = 0.55;
const LENGTH_NEAR: f32 = 1.35;
const THICKNESS_FAR: f32 = 0.75;
const THICKNESS_NEAR: f32 = 1.35;

/// Visual tuning for streaks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakStyle {
    pub base_length: f32,
    pub base_thickness: f32,
    pub far_opacity: f32,
    pub near_opacity: f32,
}

impl From<&RainConfig> for StreakStyle {
    fn from(config: &RainConfig) -> Self {
        Self {
            base_length: config.base_drop_length,
            base_thickness: config.base_drop_thickness,
            far_opacity: config.far_opacity,
            near_opacity: config.near_opacity,
        }
    }
}

impl StreakStyle {
    #[inline]
    pub fn length(&self, depth01: f32) -> f32 {
        self.base_length * lerp(LENGTH_FAR, LENGTH_NEAR, depth01)
    }

    #[inline]
    pub fn thickness(&self, depth01: f32) -> f32 {
        self.base_thickness * lerp(THICKNESS_FAR, THICKNESS_NEAR, depth01)
    }

    #[inline]
    pub fn opacity(&self, depth01: f32) -> f32 {
        lerp(self.far_opacity, self.near_opacity, depth01)
    }
}

/// A drawable rain streak in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
    /// Top end; fully transparent.
    pub head: Vec2,
    /// Bottom end; drawn at `opacity`.
    pub tail: Vec2,
    pub thickness: f32,
    pub opacity: f32,
}

impl Streak {
    #[inline]
    pub fn length(&self) -> f32 {
        self.tail.y - self.head.y
    }

    /// Per-instance record for the GPU streak pipeline.
    pub fn to_instance(&self) -> StreakInstance {
        StreakInstance {
            head: self.head.to_array(),
            length: self.length(),
            thickness: self.thickness,
            opacity: self.opacity,
            _pad: [0.0; 3],
        }
    }
}

/// GPU layout of one streak. Must match `StreakInstance` in `streak.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StreakInstance {
    pub head: [f32; 2],
    pub length: f32,
    pub thickness: f32,
    pub opacity: f32,
    pub _pad: [f32; 3],
}

/// Whether a pixel position lies within the drawing margin.
#[inline]
pub fn is_visible(point: Vec2, size: SurfaceSize) -> bool {
    point.x >= -CULL_MARGIN_X
        && point.x <= size.width + CULL_MARGIN_X
        && point.y >= -CULL_MARGIN_Y
        && point.y <= size.height + CULL_MARGIN_Y
}

/// Project one drop. Returns `None` when it is culled.
///
/// Culling uses the drop's own position; `offset` is the layer's parallax
/// shift and is applied afterwards, like a translated container.
pub fn project_drop(drop: &Raindrop, size: SurfaceSize, style: &StreakStyle, offset: Vec2) -> Option<Streak> {
    let position = Vec2::new(drop.x01 * size.width, drop.y01 * size.height);
    if !is_visible(position, size) {
        return None;
    }

    let head = position + offset;
    Some(Streak {
        head,
        tail: head + Vec2::new(0.0, style.length(drop.depth01)),
        thickness: style.thickness(drop.depth01),
        opacity: style.opacity(drop.depth01),
    })
}

/// Project every visible drop, preserving order.
pub fn project(drops: &[Raindrop], size: SurfaceSize, style: &StreakStyle, offset: Vec2) -> Vec<Streak> {
    drops
        .iter()
        .filter_map(|drop| project_drop(drop, size, style, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StreakStyle {
        StreakStyle::from(&RainConfig::default())
    }

    fn drop_at(x01: f32, y01: f32, depth01: f32) -> Raindrop {
        Raindrop {
            x01,
            y01,
            depth01,
            fall_speed: 0.5,
        }
    }

    #[test]
    fn test_depth_scaling() {
        let style = style();
        assert!((style.length(0.0) - 14.0 * 0.55).abs() < 1e-5);
        assert!((style.length(1.0) - 14.0 * 1.35).abs() < 1e-5);
        assert!((style.thickness(0.0) - 1.2 * 0.75).abs() < 1e-5);
        assert!((style.opacity(0.0) - 0.18).abs() < 1e-6);
        assert!((style.opacity(1.0) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_project_position() {
        let size = SurfaceSize::new(300.0, 400.0);
        let streak = project_drop(&drop_at(0.5, 0.25, 1.0), size, &style(), Vec2::ZERO).unwrap();

        assert_eq!(streak.head, Vec2::new(150.0, 100.0));
        assert!((streak.length() - 14.0 * 1.35).abs() < 1e-4);
        assert_eq!(streak.head.x, streak.tail.x);
    }

    #[test]
    fn test_offset_translates_streak() {
        let size = SurfaceSize::new(100.0, 100.0);
        let offset = Vec2::new(6.0, -3.0);
        let streak = project_drop(&drop_at(0.5, 0.5, 0.0), size, &style(), offset).unwrap();
        assert_eq!(streak.head, Vec2::new(56.0, 47.0));
    }

    #[test]
    fn test_culling_margins() {
        let size = SurfaceSize::new(100.0, 100.0);
        let style = style();

        // 1.15 * 100 = 115 is within the 40 unit margin.
        assert!(project_drop(&drop_at(1.15, 0.5, 0.5), size, &style, Vec2::ZERO).is_some());
        // On a wide surface the same fraction lands past the margin.
        let wide = SurfaceSize::new(1000.0, 100.0);
        assert!(project_drop(&drop_at(1.15, 0.5, 0.5), wide, &style, Vec2::ZERO).is_none());
        assert!(project_drop(&drop_at(-0.15, 0.5, 0.5), wide, &style, Vec2::ZERO).is_none());

        let tall = SurfaceSize::new(100.0, 1000.0);
        assert!(project_drop(&drop_at(0.5, -0.12, 0.5), tall, &style, Vec2::ZERO).is_none());
        assert!(project_drop(&drop_at(0.5, -0.05, 0.5), tall, &style, Vec2::ZERO).is_some());
    }

    #[test]
    fn test_project_skips_culled() {
        let size = SurfaceSize::new(1000.0, 1000.0);
        let drops = [drop_at(0.2, 0.2, 0.1), drop_at(0.5, 1.12, 0.2), drop_at(0.9, 0.9, 0.3)];
        let streaks = project(&drops, size, &style(), Vec2::ZERO);
        assert_eq!(streaks.len(), 2);
        assert_eq!(streaks[1].head, Vec2::new(900.0, 900.0));
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<StreakInstance>(), 32);
        let streak = Streak {
            head: Vec2::new(1.0, 2.0),
            tail: Vec2::new(1.0, 12.0),
            thickness: 1.5,
            opacity: 0.4,
        };
        let instance = streak.to_instance();
        assert_eq!(instance.head, [1.0, 2.0]);
        assert_eq!(instance.length, 10.0);
    }
}
