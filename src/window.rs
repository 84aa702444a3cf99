//! Desktop host for the widget.
//!
//! Desktops have no gyroscope, so tilt is synthesised: arrow keys hold a
//! constant angular rate and dragging with the left button turns cursor
//! motion into rate. A click without a drag taps the card. Space pauses the
//! rain. Escape collapses an expanded card, or quits when none is.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::{CardStyle, WidgetConfig};
use crate::error::RunError;
use crate::motion::MotionSample;
use crate::render::GpuState;
use crate::widget::WeatherWidget;

/// Angular rate produced by a held arrow key.
const KEY_TILT_RATE: f32 = 1.5;
/// Angular rate per logical pixel of drag per frame.
const DRAG_TILT_RATE: f32 = 0.08;
/// Cursor travel beyond which a press counts as a drag, not a tap.
const TAP_SLOP: f64 = 4.0;
/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// Synthetic motion sensor driven by keyboard and mouse.
#[derive(Debug, Default)]
struct PointerTilt {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    pressed: bool,
    last_cursor: Option<(f64, f64)>,
    drag: (f64, f64),
    travel: f64,
}

impl PointerTilt {
    fn key(&mut self, code: KeyCode, pressed: bool) {
        match code {
            KeyCode::ArrowUp => self.up = pressed,
            KeyCode::ArrowDown => self.down = pressed,
            KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::ArrowRight => self.right = pressed,
            _ => {}
        }
    }

    fn cursor(&mut self, x: f64, y: f64) {
        if self.pressed {
            if let Some((lx, ly)) = self.last_cursor {
                self.drag.0 += x - lx;
                self.drag.1 += y - ly;
                self.travel += (x - lx).hypot(y - ly);
            }
        }
        self.last_cursor = Some((x, y));
    }

    fn press(&mut self) {
        self.pressed = true;
        self.travel = 0.0;
    }

    /// Returns `true` if the press ended as a tap.
    fn release(&mut self) -> bool {
        self.pressed = false;
        self.travel < TAP_SLOP
    }

    fn axis(negative: bool, positive: bool) -> f32 {
        match (negative, positive) {
            (true, false) => -KEY_TILT_RATE,
            (false, true) => KEY_TILT_RATE,
            _ => 0.0,
        }
    }

    /// Current rates; consumes accumulated drag.
    fn sample(&mut self, timestamp: f64, scale_factor: f64) -> Option<MotionSample> {
        let (dx, dy) = std::mem::take(&mut self.drag);
        let pitch = Self::axis(self.up, self.down) + (dy / scale_factor) as f32 * DRAG_TILT_RATE;
        let roll = Self::axis(self.left, self.right) + (dx / scale_factor) as f32 * DRAG_TILT_RATE;
        Some(MotionSample::new(pitch, roll, timestamp))
    }
}

struct App {
    widget: WeatherWidget,
    style: CardStyle,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    tilt: PointerTilt,
    error: Option<RunError>,
}

impl App {
    fn new(config: WidgetConfig) -> Self {
        let style = config.cards.first().map(|c| c.style).unwrap_or_default();
        Self {
            widget: WeatherWidget::new(config),
            style,
            window: None,
            gpu_state: None,
            tilt: PointerTilt::default(),
            error: None,
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let logical = size.to_logical::<f32>(self.scale_factor());
        if self.widget.on_resize(logical.width, logical.height) {
            log::debug!("reseeded rain for {}x{}", logical.width, logical.height);
        }
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.resize(size);
        }
    }

    fn tap(&mut self) {
        let Some(id) = self.widget.cards().cards().first().map(|c| c.id.clone()) else {
            return;
        };
        let expanded = self.widget.on_tap(&id);
        log::info!("card {id:?} {}", if expanded { "expanded" } else { "collapsed" });
        self.update_title();
    }

    fn update_title(&self) {
        let (Some(window), Some(card)) = (&self.window, self.widget.cards().cards().first()) else {
            return;
        };

        let mut title = format!("{} {}", card.location, card.temperature_label());
        if self.widget.cards().is_expanded(&card.id) {
            title = format!("{title} · {} · {}", card.forecast, card.range_label());
        }
        window.set_title(&title);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = self.widget.clock().now();
        let scale_factor = self.scale_factor();
        let sample = self.tilt.sample(now, scale_factor);
        self.widget.on_motion(sample);
        self.widget.on_frame(now);

        let clock = self.widget.clock();
        if clock.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", clock.fps());
        }

        let frame = self.widget.frame();
        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&frame, &self.style) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = self.widget.config();
        let window_attrs = Window::default_attributes()
            .with_title("Drizzle")
            .with_inner_size(winit::dpi::LogicalSize::new(config.card_width, config.card_height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window.clone());
        self.resize(window.inner_size());
        self.update_title();
        window.request_redraw();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("suspended; motion and clock reset");
        self.widget.suspend();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if code == KeyCode::Space && pressed && !repeat {
                    let paused = self.widget.clock_mut().toggle_pause();
                    log::info!("rain {}", if paused { "paused" } else { "resumed" });
                } else if code == KeyCode::Escape && pressed && !repeat {
                    // First Escape folds the card back, the next one quits.
                    if self.widget.collapse_cards() {
                        self.update_title();
                    } else {
                        event_loop.exit();
                    }
                } else {
                    self.tilt.key(code, pressed);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.tilt.press(),
                ElementState::Released => {
                    if self.tilt.release() {
                        self.tap();
                    }
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.tilt.cursor(position.x, position.y);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the widget window and run until it is closed.
pub fn run(config: WidgetConfig) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_produce_rates() {
        let mut tilt = PointerTilt::default();
        tilt.key(KeyCode::ArrowDown, true);
        tilt.key(KeyCode::ArrowLeft, true);

        let sample = tilt.sample(1.0, 1.0).unwrap();
        assert_eq!(sample.pitch_rate, KEY_TILT_RATE);
        assert_eq!(sample.roll_rate, -KEY_TILT_RATE);

        tilt.key(KeyCode::ArrowDown, false);
        tilt.key(KeyCode::ArrowLeft, false);
        let still = tilt.sample(2.0, 1.0).unwrap();
        assert_eq!((still.pitch_rate, still.roll_rate), (0.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut tilt = PointerTilt::default();
        tilt.key(KeyCode::ArrowUp, true);
        tilt.key(KeyCode::ArrowDown, true);
        assert_eq!(tilt.sample(0.0, 1.0).unwrap().pitch_rate, 0.0);
    }

    #[test]
    fn test_drag_is_consumed_once() {
        let mut tilt = PointerTilt::default();
        tilt.cursor(10.0, 10.0);
        tilt.press();
        tilt.cursor(20.0, 30.0);

        let sample = tilt.sample(0.0, 2.0).unwrap();
        assert!((sample.roll_rate - 5.0 * DRAG_TILT_RATE).abs() < 1e-6);
        assert!((sample.pitch_rate - 10.0 * DRAG_TILT_RATE).abs() < 1e-6);

        let next = tilt.sample(0.1, 2.0).unwrap();
        assert_eq!(next.roll_rate, 0.0);
        assert!(!tilt.release());
    }

    #[test]
    fn test_click_is_tap() {
        let mut tilt = PointerTilt::default();
        tilt.cursor(10.0, 10.0);
        tilt.press();
        tilt.cursor(11.0, 10.0);
        assert!(tilt.release());
    }
}
