//! Bloom intensity shared by the galaxy and the comets.

use serde::{Deserialize, Serialize};

/// Post-process bloom parameters handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloomSettings {
    pub intensity: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            intensity: 1.2,
            luminance_threshold: 0.0,
            luminance_smoothing: 0.9,
        }
    }
}

/// A bloom level that spikes on impact and falls back after a short hold.
///
/// Triggers are last-write-wins: a second impact while the first is still
/// holding restarts the hold instead of stacking.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowPulse {
    baseline: f32,
    peak: f32,
    hold: f32,
    remaining: Option<f32>,
}

impl Default for GlowPulse {
    fn default() -> Self {
        Self::new(1.2, 5.0, 0.25)
    }
}

impl GlowPulse {
    pub fn new(baseline: f32, peak: f32, hold_secs: f32) -> Self {
        Self {
            baseline,
            peak,
            hold: hold_secs.max(0.0),
            remaining: None,
        }
    }

    /// Spike to the peak and restart the hold.
    pub fn trigger(&mut self) {
        self.remaining = Some(self.hold);
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt.max(0.0);
            if *remaining <= 0.0 {
                self.remaining = None;
            }
        }
    }

    /// Current bloom intensity.
    pub fn intensity(&self) -> f32 {
        if self.remaining.is_some() {
            self.peak
        } else {
            self.baseline
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn set_baseline(&mut self, baseline: f32) {
        self.baseline = baseline;
    }

    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Bloom settings with the current intensity folded in.
    pub fn bloom(&self) -> BloomSettings {
        BloomSettings {
            intensity: self.intensity(),
            ..BloomSettings::default()
        }
    }
}
