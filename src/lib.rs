//! # Drizzle
//!
//! A decorative weather card: location, temperature and forecast over an
//! animated rain field that shifts with device tilt.
//!
//! The interesting parts are two small simulations:
//!
//! - [`RainField`] keeps a few hundred depth-weighted drops in normalized
//!   surface space, moves them every frame, recycles the ones that fall off
//!   the bottom and reseeds itself when the surface changes shape.
//! - [`DampingFilter`] turns raw pitch/roll rates from a motion sensor into a
//!   smooth tilt value that drives the parallax offset of each layer.
//!
//! Both are driven explicitly. [`WeatherWidget`] wires them together and the
//! host calls it from its own event loop:
//!
//! ```ignore
//! use drizzle::prelude::*;
//!
//! let mut widget = WeatherWidget::new(WidgetConfig::default());
//! widget.on_resize(300.0, 400.0);
//!
//! // per sensor reading
//! widget.on_motion(Some(MotionSample::new(pitch_rate, roll_rate, t)));
//!
//! // per display refresh
//! widget.on_frame(now);
//! for streak in widget.frame().streaks {
//!     // draw a line from streak.head to streak.tail fading in
//! }
//! ```
//!
//! ## Drop appearance
//!
//! | Depth | Speed | Length | Thickness | Opacity |
//! |-------|-------|--------|-----------|---------|
//! | 0 (far) | ×0.6 | ×0.55 | ×0.75 | `far_opacity` |
//! | 1 (near) | ×1.6 | ×1.35 | ×1.35 | `near_opacity` |
//!
//! The `drizzle` binary opens the card in a window; arrow keys or a mouse
//! drag stand in for the gyroscope.

pub mod card;
pub mod config;
pub mod error;
pub mod motion;
pub mod parallax;
pub mod projection;
pub mod rain;
pub mod render;
pub mod time;
pub mod widget;
mod window;

pub use card::{CardStack, WeatherCard};
pub use config::{CardStyle, MotionConfig, ParallaxConfig, RainConfig, WidgetConfig};
pub use error::{ConfigError, GpuError, RunError};
pub use glam::Vec2;
pub use motion::{DampedMotion, DampingFilter, MotionSample, MotionSource, MotionTracker};
pub use parallax::{ParallaxLayer, ParallaxOffsets};
pub use projection::{Streak, StreakStyle};
pub use rain::{RainField, Raindrop, SurfaceSize};
pub use time::FrameClock;
pub use widget::{FrameOutput, WeatherWidget};
pub use window::run;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use drizzle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::card::{CardStack, WeatherCard};
    pub use crate::config::{CardStyle, MotionConfig, ParallaxConfig, RainConfig, WidgetConfig};
    pub use crate::motion::{
        DampedMotion, DampingFilter, MotionSample, MotionSource, MotionTracker, ScriptedMotion,
        Unavailable,
    };
    pub use crate::parallax::{ParallaxLayer, ParallaxOffsets};
    pub use crate::projection::{Streak, StreakStyle};
    pub use crate::rain::{RainField, Raindrop, SurfaceSize};
    pub use crate::time::FrameClock;
    pub use crate::widget::{FrameOutput, WeatherWidget};
    pub use crate::Vec2;
}
