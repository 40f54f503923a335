//! Frame clock.
//!
//! Particle spin, pulse and accent bobbing are functions of elapsed wall-clock
//! time, while the global group rotation integrates the per-frame delta. The
//! clock provides both, plus a frame counter and a periodically refreshed FPS
//! figure for the window title.

use std::time::{Duration, Instant};

/// Timing of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Wall-clock source for the render loop.
#[derive(Debug)]
pub struct SceneClock {
    start: Instant,
    last_tick: Instant,
    current: FrameTime,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl SceneClock {
    /// A clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// A clock whose zero is `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_tick: start,
            current: FrameTime::default(),
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to now. Call once per rendered frame.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`.
    ///
    /// Instants earlier than the previous tick count as a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let now = now.max(self.last_tick);
        self.current = FrameTime {
            elapsed: now.duration_since(self.start).as_secs_f32(),
            delta: now.duration_since(self.last_tick).as_secs_f32(),
        };
        self.last_tick = now;
        self.frame_count += 1;

        let since_fps = now.duration_since(self.fps_update_time);
        if since_fps >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_fps.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.current
    }

    /// Timing of the most recent tick.
    #[inline]
    pub fn current(&self) -> FrameTime {
        self.current
    }

    /// Ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}
