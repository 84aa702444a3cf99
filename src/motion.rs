//! Tilt damping.
//!
//! Raw angular-rate samples are turned into a stable parallax signal by a
//! leaky integrator: each sample adds `rate * dt` to an accumulator which
//! decays by `exp(-decay_hz * dt)`. Sustained tilt pushes the value up,
//! and it drifts back to zero once the device is still.
//!
//! # Example
//!
//! ```ignore
//! use drizzle::motion::DampingFilter;
//!
//! let mut filter = DampingFilter::new(1.5);
//! let out = filter.update(1.0, 0.0, 0.1);
//! assert!((out.pitch - 0.1).abs() < 1e-6);
//! ```

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::MotionConfig;

/// Damped tilt values, read every frame for the parallax offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DampedMotion {
    pub pitch: f32,
    pub roll: f32,
}

impl DampedMotion {
    /// `(roll, pitch)`: roll drives x, pitch drives y.
    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.roll, self.pitch)
    }
}

/// Exponential-decay accumulator over pitch and roll rates.
#[derive(Clone, Debug)]
pub struct DampingFilter {
    decay_hz: f32,
    state: DampedMotion,
}

impl DampingFilter {
    /// Filter at rest. `decay_hz` is how quickly accumulated tilt is forgotten.
    pub fn new(decay_hz: f32) -> Self {
        Self {
            decay_hz,
            state: DampedMotion::default(),
        }
    }

    /// Decay factor for an interval. Always in `(0, 1]` for `decay_hz > 0`.
    #[inline]
    pub fn decay(&self, elapsed: f32) -> f32 {
        (-self.decay_hz * elapsed.max(0.0)).exp()
    }

    /// Fold one sample into the state and return the new damped values.
    ///
    /// Negative `elapsed` is treated as zero, which leaves the state unchanged.
    pub fn update(&mut self, pitch_rate: f32, roll_rate: f32, elapsed: f32) -> DampedMotion {
        let dt = elapsed.max(0.0);
        let decay = self.decay(dt);

        self.state.pitch = self.state.pitch * decay + pitch_rate * dt;
        self.state.roll = self.state.roll * decay + roll_rate * dt;
        self.state
    }

    /// Current damped values.
    #[inline]
    pub fn state(&self) -> DampedMotion {
        self.state
    }

    pub fn decay_hz(&self) -> f32 {
        self.decay_hz
    }

    /// Back to rest: both accumulators at zero.
    pub fn reset(&mut self) {
        self.state = DampedMotion::default();
    }
}

/// One reading from the motion sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Rotation rate about the x axis.
    pub pitch_rate: f32,
    /// Rotation rate about the y axis.
    pub roll_rate: f32,
    /// Sample time in seconds on any monotonic clock.
    pub timestamp: f64,
}

impl MotionSample {
    pub fn new(pitch_rate: f32, roll_rate: f32, timestamp: f64) -> Self {
        Self {
            pitch_rate,
            roll_rate,
            timestamp,
        }
    }
}

/// Feeds a [`DampingFilter`] from timestamped samples.
///
/// Elapsed time comes from consecutive timestamps. The first sample of a
/// feed has no predecessor and uses the nominal sample interval instead.
#[derive(Clone, Debug)]
pub struct MotionTracker {
    filter: DampingFilter,
    sample_interval: f32,
    last_timestamp: Option<f64>,
}

impl MotionTracker {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            filter: DampingFilter::new(config.decay_hz),
            sample_interval: config.sample_interval,
            last_timestamp: None,
        }
    }

    /// Apply a sample if there is one.
    ///
    /// `None` means the sensor had nothing to report; the damped values are
    /// kept as they are.
    pub fn on_sample(&mut self, sample: Option<MotionSample>) -> DampedMotion {
        let Some(sample) = sample else {
            return self.filter.state();
        };

        let elapsed = match self.last_timestamp {
            Some(last) => (sample.timestamp - last).max(0.0) as f32,
            None => self.sample_interval,
        };
        self.last_timestamp = Some(sample.timestamp);

        self.filter.update(sample.pitch_rate, sample.roll_rate, elapsed)
    }

    /// Drain everything the source has ready.
    pub fn drain<S: MotionSource + ?Sized>(&mut self, source: &mut S) -> DampedMotion {
        while let Some(sample) = source.poll() {
            self.on_sample(Some(sample));
        }
        self.filter.state()
    }

    #[inline]
    pub fn damped(&self) -> DampedMotion {
        self.filter.state()
    }

    pub fn filter(&self) -> &DampingFilter {
        &self.filter
    }

    /// Back to zero, as on widget re-creation.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.last_timestamp = None;
    }
}

/// A subscription-style motion feed.
pub trait MotionSource {
    /// Next pending sample, or `None` if nothing is ready.
    fn poll(&mut self) -> Option<MotionSample>;
}

/// A feed for devices without a motion sensor. Never yields.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl MotionSource for Unavailable {
    fn poll(&mut self) -> Option<MotionSample> {
        None
    }
}

/// Replays queued samples in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedMotion {
    queue: VecDeque<MotionSample>,
}

impl ScriptedMotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: MotionSample) {
        self.queue.push_back(sample);
    }

    /// Constant rates sampled every `interval` seconds, starting at `start`.
    pub fn steady(pitch_rate: f32, roll_rate: f32, interval: f64, start: f64, count: usize) -> Self {
        let queue = (0..count)
            .map(|i| MotionSample::new(pitch_rate, roll_rate, start + interval * i as f64))
            .collect();
        Self { queue }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl MotionSource for ScriptedMotion {
    fn poll(&mut self) -> Option<MotionSample> {
        self.queue.pop_front()
    }
}

impl FromIterator<MotionSample> for ScriptedMotion {
    fn from_iter<I: IntoIterator<Item = MotionSample>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}
