//! Frame timing.
//!
//! The display delivers a frame signal with the current time; the clock turns
//! that into a per-frame step for the rain field. Long gaps (the app was in
//! the background, a debugger was attached) are capped so drops never jump.
//!
//! # Example
//!
//! ```ignore
//! use drizzle::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame callback:
//! let dt = clock.tick(now_secs);
//! field.advance(dt);
//! ```

use std::time::Instant;

/// Largest step a single frame may take, in seconds.
pub const MAX_FRAME_DELTA: f32 = 1.0 / 20.0;

/// Turns frame timestamps into clamped simulation steps.
#[derive(Debug)]
pub struct FrameClock {
    /// Reference point for [`now`](Self::now).
    start: Instant,
    /// Timestamp of the previous tick, in seconds.
    last: Option<f64>,
    /// Step produced by the last tick.
    delta_secs: f32,
    /// Ticks since creation or reset.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: f64,
    fps_update_interval: f64,
    paused: bool,
}

impl FrameClock {
    /// Clock starting now. The first tick yields 0.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: None,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: 0.0,
            fps_update_interval: 0.5,
            paused: false,
        }
    }

    /// Advance to `now` (seconds) and return the step for this frame.
    ///
    /// The first tick returns 0. Clock regressions return 0. Steps are capped
    /// at [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self, now: f64) -> f32 {
        let raw = match self.last {
            Some(last) => (now - last).max(0.0) as f32,
            None => {
                self.fps_update_time = now;
                0.0
            }
        };
        self.last = Some(now);

        self.delta_secs = if self.paused { 0.0 } else { raw.min(MAX_FRAME_DELTA) };
        self.frame_count += 1;

        let since = now - self.fps_update_time;
        if since >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = (frames as f64 / since) as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Wall-clock seconds since the clock was created or reset. Hosts without
    /// their own frame timestamp pass this to [`tick`](Self::tick).
    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Step produced by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since creation or reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second of ticks.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While paused every tick yields 0.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip between paused and running. Returns whether the clock is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Forget the previous timestamp; the next tick yields 0.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.last = None;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
