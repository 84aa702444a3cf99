//! Rain particle field.
//!
//! Drops live in normalized unit space: `x01`/`y01` are fractions of the
//! drawing surface, so the simulation is independent of pixel resolution.
//! The field is seeded in one batch whenever the surface first gets a size
//! or changes shape enough to make the old density look wrong, and every
//! frame [`RainField::advance`] moves the drops down and recycles the ones
//! that fall past the bottom.
//!
//! # Example
//!
//! ```ignore
//! use drizzle::rain::RainField;
//! use drizzle::config::RainConfig;
//!
//! let mut field = RainField::seeded(RainConfig::default(), 7);
//! field.resize(300.0, 400.0);
//! field.advance(1.0 / 60.0);
//! assert!(field.len() >= 40);
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::RainConfig;

/// Recycled drops restart at this height, just above the visible area.
pub const WRAP_TOP: f32 = -0.12;
/// Drops below this height are recycled.
pub const WRAP_BOTTOM: f32 = 1.12;
/// Horizontal wrap bounds.
pub const WRAP_LEFT: f32 = -0.15;
pub const WRAP_RIGHT: f32 = 1.15;

/// Fall speed range before the fixed 0.55 scale is applied.
const FALL_SPEED_MIN: f32 = 0.35;
const FALL_SPEED_MAX: f32 = 1.15;
const FALL_SPEED_SCALE: f32 = 0.55;

/// Depth scales the fall speed between these multipliers (far..near).
const DEPTH_SPEED_FAR: f32 = 0.6;
const DEPTH_SPEED_NEAR: f32 = 1.6;

/// Surfaces smaller than this in either dimension are degenerate.
const DEGENERATE_EXTENT: f32 = 2.0;

/// Linear interpolation. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Number of drops for a surface of `area` square units.
///
/// `density` is drops per 10,000 square units; the result never drops
/// below `min_count`.
pub fn target_drop_count(area: f32, density: f32, min_count: usize) -> usize {
    let count = (area / 10_000.0 * density).round();
    if count.is_finite() && count > min_count as f32 {
        count as usize
    } else {
        min_count
    }
}

/// Whether a surface change from `last` to `size` requires reseeding.
///
/// A degenerate size on either side always rebuilds, so the first valid size
/// after a collapsed surface is reseeded. Otherwise a relative change strictly
/// greater than `threshold` in either dimension rebuilds.
pub fn should_rebuild(size: SurfaceSize, last: SurfaceSize, threshold: f32) -> bool {
    if size.is_degenerate() || last.is_degenerate() {
        return true;
    }

    let width_change = (size.width - last.width).abs() / last.width.max(1.0);
    let height_change = (size.height - last.height).abs() / last.height.max(1.0);

    width_change > threshold || height_change > threshold
}

/// Size of the drawing surface in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width < DEGENERATE_EXTENT || self.height < DEGENERATE_EXTENT
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// One simulated rain streak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    /// Horizontal position as a fraction of surface width.
    pub x01: f32,
    /// Vertical position as a fraction of surface height (0 = top).
    pub y01: f32,
    /// Fake distance, 0 = far, 1 = near. Fixed for the drop's lifetime.
    pub depth01: f32,
    /// Base downward speed in surface heights per second.
    pub fall_speed: f32,
}

impl Raindrop {
    /// A fresh drop scattered anywhere in the visible area.
    pub fn scattered<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let depth01 = rng.gen_range(0.0..=1.0);
        Self {
            x01: rng.gen_range(0.0..=1.0),
            y01: rng.gen_range(0.0..=1.0),
            depth01,
            fall_speed: random_fall_speed(rng),
        }
    }

    /// Downward speed after depth and the global multiplier are applied.
    #[inline]
    pub fn effective_speed(&self, global_fall_speed: f32) -> f32 {
        self.fall_speed * lerp(DEPTH_SPEED_FAR, DEPTH_SPEED_NEAR, self.depth01) * global_fall_speed
    }

    /// Restart at the top with a new column and speed. Depth is kept.
    pub fn recycle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.y01 = WRAP_TOP;
        self.x01 = rng.gen_range(0.0..=1.0);
        self.fall_speed = random_fall_speed(rng);
    }

    /// Move the drop by `dt` seconds, recycling and wrapping as needed.
    pub fn step<R: Rng + ?Sized>(&mut self, dt: f32, global_fall_speed: f32, rng: &mut R) {
        self.y01 += self.effective_speed(global_fall_speed) * dt;

        if self.y01 > WRAP_BOTTOM {
            self.recycle(rng);
        }

        if self.x01 < WRAP_LEFT {
            self.x01 = WRAP_RIGHT;
        } else if self.x01 > WRAP_RIGHT {
            self.x01 = WRAP_LEFT;
        }
    }
}

fn random_fall_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(FALL_SPEED_MIN..=FALL_SPEED_MAX) * FALL_SPEED_SCALE
}

/// The owning collection of drops for one drawing surface.
///
/// Generic over the random source so tests can inject a seeded generator.
#[derive(Debug)]
pub struct RainField<R: Rng = SmallRng> {
    config: RainConfig,
    drops: Vec<Raindrop>,
    last_size: Option<SurfaceSize>,
    rng: R,
}

impl RainField<SmallRng> {
    /// Field seeded from OS entropy.
    pub fn new(config: RainConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Field with a deterministic random sequence.
    pub fn seeded(config: RainConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RainField<R> {
    /// Empty field drawing from `rng`. Drops appear on the first
    /// [`resize`](Self::resize).
    pub fn with_rng(config: RainConfig, rng: R) -> Self {
        Self {
            config,
            drops: Vec::new(),
            last_size: None,
            rng,
        }
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Current drops, in creation order.
    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    /// Number of live drops.
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    /// `true` until the field has seen a surface size.
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Size recorded by the last [`resize`](Self::resize).
    pub fn last_size(&self) -> Option<SurfaceSize> {
        self.last_size
    }

    /// Report a new surface size. Returns `true` if the field was reseeded.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let size = SurfaceSize::new(width, height);
        let rebuild = self.drops.is_empty()
            || self
                .last_size
                .map_or(true, |last| should_rebuild(size, last, self.config.rebuild_threshold));

        if rebuild {
            self.regenerate(size);
        } else {
            log::trace!(
                "rain field kept {} drops across resize to {}x{}",
                self.drops.len(),
                width,
                height
            );
        }

        self.last_size = Some(size);
        rebuild
    }

    /// Replace every drop with a fresh batch sized for `size`.
    pub fn regenerate(&mut self, size: SurfaceSize) {
        let count = target_drop_count(
            size.area().max(0.0),
            self.config.drops_per_10k_pixels,
            self.config.min_drop_count,
        );

        self.drops = (0..count).map(|_| Raindrop::scattered(&mut self.rng)).collect();

        log::debug!(
            "rain field seeded {} drops for {}x{} surface",
            count,
            size.width,
            size.height
        );
    }

    /// Advance every drop by `dt` seconds. Negative `dt` counts as zero.
    ///
    /// The caller is expected to clamp large gaps (see
    /// [`FrameClock`](crate::time::FrameClock)).
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        if dt == 0.0 {
            return;
        }

        let speed = self.config.global_fall_speed;
        for drop in &mut self.drops {
            drop.step(dt, speed, &mut self.rng);
        }
    }
}
