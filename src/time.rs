//! Frame timing for the scene.
//!
//! [`FrameClock`] turns wall-clock frames into the `dt` every simulation
//! module consumes. Deltas are clamped to [`FrameClock::max_delta`] so a
//! stalled frame (window drag, debugger, laptop sleep) does not teleport
//! comets to their targets or skip whole intro phases.
//!
//! # Example
//!
//! ```ignore
//! use galaxy_scene::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In the render loop:
//! let dt = clock.update();
//! scene.update(dt);
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single frame delta, seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred; `None` before the first update.
    last_frame: Option<Instant>,
    /// Simulated seconds since start (sum of clamped, scaled deltas).
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window: f32,
    fps_update_interval: f32,
    paused: bool,
    /// Fixed delta for deterministic updates.
    fixed_delta: Option<f32>,
    time_scale: f32,
    max_delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window: 0.0,
            fps_update_interval: 0.5,
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Sample the wall clock and return this frame's delta. Call once per
    /// frame.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = match self.last_frame {
            Some(last) => now.duration_since(last),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        self.advance(raw.as_secs_f32())
    }

    /// Step the clock by a measured delta and return the delta the
    /// simulation should use.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        let raw = raw_delta.max(0.0);
        let base = self.fixed_delta.unwrap_or(raw).min(self.max_delta);
        self.delta_secs = base * self.time_scale;
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        // FPS is measured against real time, not the clamped delta.
        self.fps_window += raw;
        if self.fps_window >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / self.fps_window;
            self.fps_frame_count = self.frame_count;
            self.fps_window = 0.0;
        }

        self.delta_secs
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// While paused `delta()` is 0 and `elapsed()` stops.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing. The paused span is not counted.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame = None;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta instead of wall time. `None` restores real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    /// `1.0` is real time, `0.5` slow motion.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Largest delta a single frame may report, before time scaling.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }

    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            time_scale: self.time_scale,
            max_delta: self.max_delta,
            ..Self::new()
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
