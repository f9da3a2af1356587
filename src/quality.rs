//! Device quality tiers.
//!
//! Classifying the host display is the host's job; this module only maps a
//! tier to concrete budgets.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Widths below this are phones.
pub const MOBILE_BREAKPOINT: u32 = 768;
/// Widths below this (and at least [`MOBILE_BREAKPOINT`]) are tablets.
pub const TABLET_BREAKPOINT: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceTier {
    /// Classify by logical viewport width.
    pub fn from_viewport_width(width: u32) -> Self {
        if width < MOBILE_BREAKPOINT {
            DeviceTier::Mobile
        } else if width < TABLET_BREAKPOINT {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        }
    }
}

impl FromStr for DeviceTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" | "phone" => Ok(DeviceTier::Mobile),
            "tablet" => Ok(DeviceTier::Tablet),
            "desktop" => Ok(DeviceTier::Desktop),
            _ => Err(ConfigError::UnknownTier(s.to_string())),
        }
    }
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceTier::Mobile => "mobile",
            DeviceTier::Tablet => "tablet",
            DeviceTier::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

/// Per-tier budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    pub galaxy_particles: u32,
    pub starfield_particles: u32,
    pub bloom_intensity: f32,
    /// Device pixel ratio cap.
    pub dpr: f32,
    /// Comets per batch.
    pub comet_count: u32,
    /// Text sampling stride.
    pub particle_density: u32,
}

impl QualitySettings {
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Mobile => Self {
                galaxy_particles: 50_000,
                starfield_particles: 600,
                bloom_intensity: 0.8,
                dpr: 1.0,
                comet_count: 2,
                particle_density: 5,
            },
            DeviceTier::Tablet => Self {
                galaxy_particles: 100_000,
                starfield_particles: 1000,
                bloom_intensity: 1.0,
                dpr: 1.5,
                comet_count: 5,
                particle_density: 4,
            },
            DeviceTier::Desktop => Self {
                galaxy_particles: 200_000,
                starfield_particles: 1500,
                bloom_intensity: 1.2,
                dpr: 2.0,
                comet_count: 8,
                particle_density: 3,
            },
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self::for_tier(DeviceTier::Desktop)
    }
}
