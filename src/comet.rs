//! Comets: a quadratic Bézier flight, an impact, then a fade.
//!
//! A comet is a small state machine driven by [`Comet::update`]:
//!
//! ```text
//! Flying --(progress >= 1, emits Impact)--> Dying --(opacity <= 0, emits Faded)--> Dead
//! ```
//!
//! Transitions only go forward, so each event is emitted at most once per
//! comet no matter how the frame deltas fall.

use crate::error::ConfigError;
use glam::Vec3;
use std::collections::VecDeque;

/// Number of recent positions a flying comet keeps for its trail.
pub const TRAIL_LENGTH: usize = 5;
/// Trail width relative to the comet size.
pub const TRAIL_WIDTH_FACTOR: f32 = 12.0;
/// Default opacity lost per second while dying.
pub const DEFAULT_FADE_RATE: f32 = 2.0;

/// Stable identifier for a comet within a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CometId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CometStatus {
    Flying,
    Dying,
    Dead,
}

/// Lifecycle notifications produced by [`Comet::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CometEvent {
    /// The comet reached its target.
    Impact(CometId),
    /// The comet finished fading and can be removed.
    Faded(CometId),
}

/// Point on a quadratic Bézier curve.
#[inline]
pub fn quadratic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// Short ribbon behind a flying comet, newest point first.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec3>,
    width: f32,
}

impl Trail {
    fn new(size: f32) -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_LENGTH),
            width: size * TRAIL_WIDTH_FACTOR,
        }
    }

    fn push(&mut self, point: Vec3) {
        if self.points.len() == TRAIL_LENGTH {
            self.points.pop_back();
        }
        self.points.push_front(point);
    }

    /// Sampled positions, newest first.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Width at the head of the trail.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Width at point `index`, tapering quadratically toward the tail.
    pub fn width_at(&self, index: usize) -> f32 {
        let falloff = 1.0 - index as f32 / TRAIL_LENGTH as f32;
        self.width * falloff.max(0.0).powi(2)
    }
}

/// A single comet.
#[derive(Debug, Clone)]
pub struct Comet {
    id: CometId,
    start: Vec3,
    control: Vec3,
    target: Vec3,
    size: f32,
    duration: f32,
    elapsed: f32,
    fade_rate: f32,
    position: Vec3,
    final_position: Option<Vec3>,
    opacity: f32,
    status: CometStatus,
    trail: Option<Trail>,
}

impl Comet {
    /// Create a comet at `start` that will reach `target` after
    /// `duration_secs`.
    pub fn new(
        id: CometId,
        start: Vec3,
        control: Vec3,
        target: Vec3,
        size: f32,
        duration_secs: f32,
    ) -> Result<Self, ConfigError> {
        if !duration_secs.is_finite() || !start.is_finite() || !control.is_finite() || !target.is_finite() {
            return Err(ConfigError::NotFinite("comet"));
        }
        if duration_secs <= 0.0 {
            return Err(ConfigError::NonPositiveDuration { what: "comet flight", value: duration_secs });
        }
        let mut trail = Trail::new(size);
        trail.push(start);
        Ok(Self {
            id,
            start,
            control,
            target,
            size,
            duration: duration_secs,
            elapsed: 0.0,
            fade_rate: DEFAULT_FADE_RATE,
            position: start,
            final_position: None,
            opacity: 1.0,
            status: CometStatus::Flying,
            trail: Some(trail),
        })
    }

    /// Override the fade speed, opacity per second.
    pub fn with_fade_rate(mut self, rate: f32) -> Self {
        self.fade_rate = rate.max(f32::EPSILON);
        self
    }

    /// Advance by `dt` seconds, pushing any lifecycle events.
    pub fn update(&mut self, dt: f32, events: &mut Vec<CometEvent>) {
        let dt = dt.max(0.0);
        match self.status {
            CometStatus::Flying => {
                self.elapsed += dt;
                let progress = self.elapsed / self.duration;
                if progress >= 1.0 {
                    self.position = self.target;
                    self.final_position = Some(self.target);
                    self.status = CometStatus::Dying;
                    self.trail = None;
                    log::debug!("comet {} impact at {:?}", self.id.0, self.target);
                    events.push(CometEvent::Impact(self.id));
                } else {
                    self.position = quadratic_bezier(self.start, self.control, self.target, progress);
                    if let Some(trail) = self.trail.as_mut() {
                        trail.push(self.position);
                    }
                }
            }
            CometStatus::Dying => {
                self.opacity -= self.fade_rate * dt;
                if self.opacity <= 0.0 {
                    self.opacity = 0.0;
                    self.status = CometStatus::Dead;
                    log::debug!("comet {} faded", self.id.0);
                    events.push(CometEvent::Faded(self.id));
                }
            }
            CometStatus::Dead => {}
        }
    }

    #[inline]
    pub fn id(&self) -> CometId {
        self.id
    }

    #[inline]
    pub fn status(&self) -> CometStatus {
        self.status
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Where the comet landed, once it has.
    #[inline]
    pub fn final_position(&self) -> Option<Vec3> {
        self.final_position
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Flight progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    /// The trail, present only while flying.
    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }

    pub fn is_dead(&self) -> bool {
        self.status == CometStatus::Dead
    }
}
