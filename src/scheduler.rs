//! Comet population management.
//!
//! Every `interval` seconds a batch of comets is queued, each with its own
//! random delay so bursts are staggered. Spawned comets fly toward the
//! galaxy core; impacts spike the shared [`GlowPulse`] and faded comets are
//! removed. All waiting is done through a [`TimerQueue`] advanced by the
//! frame delta, so tearing the scheduler down cancels everything at once.

use crate::comet::{Comet, CometEvent, CometId};
use crate::error::ConfigError;
use crate::glow::GlowPulse;
use crate::spawn::SpawnContext;
use crate::timer::{TimerHandle, TimerQueue};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Scheduler tuning. Defaults reproduce the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between batches.
    pub interval: f32,
    /// Comets per batch.
    pub batch_size: u32,
    /// Upper bound (exclusive) of each comet's spawn delay.
    pub max_delay: f32,
    /// Minimum start distance from the origin.
    pub base_radius: f32,
    /// Start distance is drawn from `base_radius..base_radius + radius_span`.
    pub radius_span: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub duration_min: f32,
    pub duration_max: f32,
    /// Where every comet lands.
    pub target: Vec3,
    /// Opacity lost per second after impact.
    pub fade_rate: f32,
    /// Spawns are skipped while this many comets are alive.
    pub max_active: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: 15.0,
            batch_size: 5,
            max_delay: 15.0,
            base_radius: 20.0,
            radius_span: 15.0,
            size_min: 0.01,
            size_max: 0.025,
            duration_min: 8.0,
            duration_max: 13.0,
            target: Vec3::new(0.0, -2.0, 0.0),
            fade_rate: 2.0,
            max_active: 64,
        }
    }
}

impl SchedulerConfig {
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_interval(mut self, interval: f32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_delay(mut self, max_delay: f32) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.interval,
            self.max_delay,
            self.base_radius,
            self.radius_span,
            self.size_min,
            self.size_max,
            self.duration_min,
            self.duration_max,
            self.fade_rate,
        ];
        if values.iter().any(|v| !v.is_finite()) || !self.target.is_finite() {
            return Err(ConfigError::NotFinite("scheduler config"));
        }
        if self.interval <= 0.0 {
            return Err(ConfigError::NonPositiveDuration { what: "comet batch interval", value: self.interval });
        }
        if self.duration_min <= 0.0 {
            return Err(ConfigError::NonPositiveDuration { what: "comet flight", value: self.duration_min });
        }
        if self.duration_max < self.duration_min {
            return Err(ConfigError::InvertedRange {
                what: "comet flight duration",
                min: self.duration_min,
                max: self.duration_max,
            });
        }
        if self.size_min <= 0.0 {
            return Err(ConfigError::NonPositiveSize { what: "comet", value: self.size_min });
        }
        if self.size_max < self.size_min {
            return Err(ConfigError::InvertedRange { what: "comet size", min: self.size_min, max: self.size_max });
        }
        if self.base_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(self.base_radius));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Batch,
    Spawn,
}

/// Owns the live comets and the timers that create them.
#[derive(Debug)]
pub struct CometScheduler {
    config: SchedulerConfig,
    timers: TimerQueue<Task>,
    interval: Option<TimerHandle>,
    comets: Vec<Comet>,
    next_id: u64,
}

impl CometScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            timers: TimerQueue::new(),
            interval: None,
            comets: Vec::new(),
            next_id: 0,
        })
    }

    /// Queue a batch now and one every interval after. Calling `start` on a
    /// running scheduler does nothing.
    pub fn start(&mut self) {
        if self.interval.is_some() {
            return;
        }
        self.timers.schedule_once(0.0, Task::Batch);
        self.interval = Some(self.timers.schedule_repeating(self.config.interval, Task::Batch));
        log::info!(
            "comet scheduler started: {} per batch every {:.0}s",
            self.config.batch_size,
            self.config.interval
        );
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Advance timers and comets by `dt` seconds.
    ///
    /// Impacts trigger `glow`; faded comets are removed. The frame's events
    /// are returned for observers, impacts always ahead of the same comet's
    /// fade.
    pub fn update(&mut self, dt: f32, ctx: &mut SpawnContext, glow: &mut GlowPulse) -> Vec<CometEvent> {
        let mut events = Vec::new();
        for comet in &mut self.comets {
            comet.update(dt, &mut events);
        }
        for event in &events {
            match *event {
                CometEvent::Impact(_) => glow.trigger(),
                CometEvent::Faded(id) => self.comets.retain(|c| c.id() != id),
            }
        }

        for task in self.timers.advance(dt) {
            match task {
                Task::Batch => {
                    for _ in 0..self.config.batch_size {
                        let delay = ctx.random_range(0.0, self.config.max_delay);
                        self.timers.schedule_once(delay, Task::Spawn);
                    }
                }
                Task::Spawn => self.spawn(ctx),
            }
        }
        events
    }

    fn spawn(&mut self, ctx: &mut SpawnContext) {
        if self.comets.len() >= self.config.max_active {
            log::debug!("comet spawn skipped, {} already active", self.comets.len());
            return;
        }
        let id = CometId(self.next_id);
        self.next_id += 1;
        match spawn_comet(id, &self.config, ctx) {
            Ok(comet) => {
                log::debug!("comet {} spawned at {:?}", id.0, comet.position());
                self.comets.push(comet);
            }
            Err(err) => log::warn!("comet {} not spawned: {err}", id.0),
        }
    }

    /// Cancel every timer and drop every comet.
    pub fn teardown(&mut self) {
        let pending = self.timers.pending();
        self.timers.cancel_all();
        self.interval = None;
        self.comets.clear();
        if pending > 0 {
            log::debug!("comet scheduler torn down, cancelled {pending} timers");
        }
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    pub fn active_count(&self) -> usize {
        self.comets.len()
    }

    /// Timers still waiting to fire, including the batch interval.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl Drop for CometScheduler {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Draw a comet's flight from `config`.
///
/// The start is on a sphere around the origin, the control point bows the
/// arc sideways from the start-target midpoint by `0.4 * |start|`.
pub fn spawn_comet(id: CometId, config: &SchedulerConfig, ctx: &mut SpawnContext) -> Result<Comet, ConfigError> {
    let radius = config.base_radius + ctx.random_range(0.0, config.radius_span);
    let start = ctx.random_spherical(radius);
    let target = config.target;

    let side = ctx.random_direction().cross(start);
    let perpendicular = side
        .try_normalize()
        .unwrap_or_else(|| start.try_normalize().unwrap_or(Vec3::Y).any_orthonormal_vector());
    let control = (start + target) * 0.5 + perpendicular * (0.4 * start.length());

    let size = ctx.random_range(config.size_min, config.size_max);
    let duration = ctx.random_range(config.duration_min, config.duration_max);
    Ok(Comet::new(id, start, control, target, size, duration)?.with_fade_rate(config.fade_rate))
}
