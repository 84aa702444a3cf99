//! The widget driver.
//!
//! [`WeatherWidget`] ties the damping filter, the rain field, the frame
//! clock and the card stack together. Nothing updates on its own: the host
//! forwards sensor samples, size changes, frame ticks and taps, then reads
//! [`WeatherWidget::frame`] to draw.
//!
//! ```ignore
//! let mut widget = WeatherWidget::new(WidgetConfig::default());
//! widget.on_resize(300.0, 400.0);
//!
//! loop {
//!     widget.on_motion(sensor.latest());
//!     widget.on_frame(now_secs());
//!     draw(&widget.frame());
//! }
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::card::CardStack;
use crate::config::WidgetConfig;
use crate::motion::{DampedMotion, MotionSample, MotionSource, MotionTracker};
use crate::parallax::ParallaxOffsets;
use crate::projection::{project, Streak, StreakStyle};
use crate::rain::{RainField, SurfaceSize};
use crate::time::FrameClock;

/// Everything the presentation layer needs for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    pub motion: DampedMotion,
    pub offsets: ParallaxOffsets,
    pub size: SurfaceSize,
    /// Visible streaks, already shifted by the rain layer offset.
    pub streaks: Vec<Streak>,
}

/// One weather widget instance.
pub struct WeatherWidget<R: Rng = SmallRng> {
    config: WidgetConfig,
    motion: MotionTracker,
    field: RainField<R>,
    clock: FrameClock,
    cards: CardStack,
    style: StreakStyle,
    size: SurfaceSize,
}

impl WeatherWidget<SmallRng> {
    pub fn new(config: WidgetConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn seeded(config: WidgetConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WeatherWidget<R> {
    pub fn with_rng(config: WidgetConfig, rng: R) -> Self {
        let motion = MotionTracker::new(&config.motion);
        let field = RainField::with_rng(config.rain.clone(), rng);
        let cards = CardStack::new(config.cards.clone());
        let style = StreakStyle::from(&config.rain);

        Self {
            config,
            motion,
            field,
            clock: FrameClock::new(),
            cards,
            style,
            size: SurfaceSize::default(),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Sensor callback. `None` (no reading) leaves the damped values alone.
    pub fn on_motion(&mut self, sample: Option<MotionSample>) -> DampedMotion {
        self.motion.on_sample(sample)
    }

    /// Pull every pending sample from a feed.
    pub fn poll_motion<S: MotionSource + ?Sized>(&mut self, source: &mut S) -> DampedMotion {
        self.motion.drain(source)
    }

    /// Surface size callback. Returns whether the rain was reseeded.
    pub fn on_resize(&mut self, width: f32, height: f32) -> bool {
        self.size = SurfaceSize::new(width, height);
        self.field.resize(width, height)
    }

    /// Frame callback with the current time in seconds. Returns the step taken.
    pub fn on_frame(&mut self, now: f64) -> f32 {
        let dt = self.clock.tick(now);
        if dt > 0.0 {
            self.field.advance(dt);
        }
        dt
    }

    /// Tap on a card. Returns whether it is now expanded.
    pub fn on_tap(&mut self, card_id: &str) -> bool {
        self.cards.tap(card_id)
    }

    /// Collapse the expanded card. Returns `false` if none was expanded.
    pub fn collapse_cards(&mut self) -> bool {
        self.cards.collapse()
    }

    /// The host went to the background and stopped the sensor feed.
    ///
    /// Tilt returns to rest and the clock forgets its last timestamp, so the
    /// first frame and sample after resuming start fresh. Drops stay put.
    pub fn suspend(&mut self) {
        self.motion.reset();
        self.clock.reset();
    }

    /// Snapshot for drawing.
    pub fn frame(&self) -> FrameOutput {
        let motion = self.motion.damped();
        let offsets = ParallaxOffsets::new(motion, &self.config.parallax);
        let streaks = project(self.field.drops(), self.size, &self.style, offsets.rain);

        FrameOutput {
            motion,
            offsets,
            size: self.size,
            streaks,
        }
    }

    #[inline]
    pub fn damped(&self) -> DampedMotion {
        self.motion.damped()
    }

    pub fn field(&self) -> &RainField<R> {
        &self.field
    }

    pub fn cards(&self) -> &CardStack {
        &self.cards
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Unavailable;
    use glam::Vec2;

    fn widget() -> WeatherWidget {
        WeatherWidget::seeded(WidgetConfig::default(), 11)
    }

    #[test]
    fn test_no_size_no_drops() {
        let widget = widget();
        assert!(widget.frame().streaks.is_empty());
        assert!(widget.field().is_empty());
    }

    #[test]
    fn test_resize_seeds_and_projects() {
        let mut widget = widget();
        assert!(widget.on_resize(300.0, 400.0));
        // drizzle preset: 12 * 80 drops
        assert_eq!(widget.field().len(), 960);

        let frame = widget.frame();
        assert_eq!(frame.streaks.len(), 960);
        assert_eq!(frame.offsets.rain, Vec2::ZERO);
    }

    #[test]
    fn test_frames_advance_rain() {
        let mut widget = widget();
        widget.on_resize(300.0, 400.0);
        let before = widget.field().drops().to_vec();

        assert_eq!(widget.on_frame(0.0), 0.0);
        assert_eq!(widget.field().drops(), before.as_slice());

        let dt = widget.on_frame(1.0 / 60.0);
        assert!(dt > 0.0);
        assert_ne!(widget.field().drops(), before.as_slice());
    }

    #[test]
    fn test_motion_drives_offsets() {
        let mut widget = widget();
        widget.on_resize(300.0, 400.0);
        widget.on_motion(Some(MotionSample::new(1.0, 0.0, 0.0)));

        let frame = widget.frame();
        assert!(frame.motion.pitch > 0.0);
        assert!(frame.offsets.rain.y > 0.0);
        assert_eq!(frame.offsets.rain.x, 0.0);
    }

    #[test]
    fn test_streaks_follow_rain_layer() {
        let mut widget = widget();
        widget.on_resize(300.0, 400.0);
        let still = widget.frame();

        widget.on_motion(Some(MotionSample::new(0.0, 1.0, 0.0)));
        let tilted = widget.frame();
        assert_eq!(tilted.streaks.len(), still.streaks.len());

        let shift = tilted.streaks[0].head - still.streaks[0].head;
        assert!((shift - tilted.offsets.rain).length() < 1e-4);
        assert!((tilted.offsets.rain.x - tilted.motion.roll * 40.0).abs() < 1e-5);
    }

    #[test]
    fn test_unavailable_sensor_is_silent() {
        let mut widget = widget();
        let motion = widget.poll_motion(&mut Unavailable);
        assert_eq!(motion, DampedMotion::default());
        assert_eq!(widget.on_motion(None), DampedMotion::default());
    }

    #[test]
    fn test_suspend_returns_to_rest() {
        let mut widget = widget();
        widget.on_resize(300.0, 400.0);
        widget.on_motion(Some(MotionSample::new(2.0, -1.0, 0.0)));
        widget.on_frame(0.0);
        widget.on_frame(0.02);
        let drops = widget.field().drops().to_vec();

        widget.suspend();
        assert_eq!(widget.damped(), DampedMotion::default());
        assert_eq!(widget.clock().frame(), 0);
        assert_eq!(widget.field().drops(), drops.as_slice());

        // The first frame after resuming takes no step.
        assert_eq!(widget.on_frame(500.0), 0.0);
    }

    #[test]
    fn test_collapse_cards() {
        let mut widget = widget();
        assert!(!widget.collapse_cards());
        widget.on_tap("london");
        assert!(widget.collapse_cards());
        assert!(!widget.cards().is_expanded("london"));
    }

    #[test]
    fn test_tap_expands_card() {
        let mut widget = widget();
        assert!(widget.on_tap("london"));
        assert!(widget.cards().is_expanded("london"));
        assert!(!widget.on_tap("london"));
    }
}
