//! Click-vs-drag classification.
//!
//! Dragging orbits the camera, so a press/release pair only counts as an
//! activation when the pointer barely moved and was released quickly.
//!
//! ```ignore
//! let mut clicks = ClickDetector::new(&config.gesture);
//! clicks.press(cursor, Instant::now());
//! // ... later
//! if clicks.release(cursor, Instant::now()) {
//!     scene.activate();
//! }
//! ```

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::config::GestureConfig;

/// Tracks one pointer press and decides whether its release is a click.
#[derive(Debug, Clone)]
pub struct ClickDetector {
    max_distance: f32,
    max_duration: Duration,
    pressed: Option<(Vec2, Instant)>,
}

impl ClickDetector {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            max_distance: config.max_distance_px,
            max_duration: Duration::from_millis(config.max_duration_ms),
            pressed: None,
        }
    }

    /// Record a press at `position` (pixels).
    pub fn press(&mut self, position: Vec2, at: Instant) {
        self.pressed = Some((position, at));
    }

    /// Record the release. Returns `true` when the gesture was a click.
    ///
    /// A release without a recorded press is never a click, and each press
    /// yields at most one.
    pub fn release(&mut self, position: Vec2, at: Instant) -> bool {
        let Some((start, pressed_at)) = self.pressed.take() else {
            return false;
        };
        let moved = start.distance(position);
        let held = at.saturating_duration_since(pressed_at);
        moved < self.max_distance && held < self.max_duration
    }

    /// Whether a press is waiting for its release.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }

    /// Forget the current press (e.g. the cursor left the window).
    pub fn cancel(&mut self) {
        self.pressed = None;
    }
}
