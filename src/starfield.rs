//! Intro starfield and its warp-speed ramp.
//!
//! Stars drift toward the camera along +Z. When they pass the far plane
//! they are recycled to the near plane at a fresh XY, so the tunnel looks
//! endless with a constant star count.

use crate::easing::ease_out_cubic;
use crate::error::ConfigError;
use crate::spawn::SpawnContext;
use crate::visuals::{lerp_color, parse_hex_color};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Cruise speed, units per second.
    pub speed: f32,
    pub particle_count: u32,
    /// Seconds to ramp from cruise to `max_speed`.
    pub accel_duration: f32,
    pub max_speed: f32,
    /// Stars span `[-half_extent, half_extent)` on X and Y.
    pub half_extent: f32,
    /// Z stars are recycled to.
    pub near: f32,
    /// Z past which stars are recycled.
    pub far: f32,
    pub inside_color: String,
    pub outside_color: String,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            particle_count: 1500,
            accel_duration: 2.0,
            max_speed: 50.0,
            half_extent: 5.0,
            near: -5.0,
            far: 5.0,
            inside_color: "#ff6030".to_string(),
            outside_color: "#1b3984".to_string(),
        }
    }
}

impl StarfieldConfig {
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.speed,
            self.accel_duration,
            self.max_speed,
            self.half_extent,
            self.near,
            self.far,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NotFinite("starfield config"));
        }
        if self.far <= self.near {
            return Err(ConfigError::InvertedRange { what: "starfield depth", min: self.near, max: self.far });
        }
        parse_hex_color(&self.inside_color)?;
        parse_hex_color(&self.outside_color)?;
        Ok(())
    }
}

/// Forward speed `elapsed` seconds after warp started.
///
/// Cubic ease-out from `speed` to `max_speed` over `accel_duration`; exactly
/// `max_speed` from then on.
pub fn warp_speed(speed: f32, max_speed: f32, accel_duration: f32, elapsed: f32) -> f32 {
    if accel_duration <= 0.0 || elapsed >= accel_duration {
        return max_speed;
    }
    speed + (max_speed - speed) * ease_out_cubic(elapsed / accel_duration)
}

#[derive(Debug, Clone)]
pub struct Starfield {
    config: StarfieldConfig,
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    /// Seconds since warp was switched on; `None` while cruising.
    warp_elapsed: Option<f32>,
}

impl Starfield {
    pub fn new(config: StarfieldConfig, ctx: &mut SpawnContext) -> Result<Self, ConfigError> {
        config.validate()?;
        let inside = parse_hex_color(&config.inside_color)?;
        let outside = parse_hex_color(&config.outside_color)?;

        let n = config.particle_count as usize;
        let mut positions = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        let depth = config.far - config.near;
        for _ in 0..n {
            let (x, y) = ctx.random_in_square(config.half_extent);
            // Initial depth fills the near half of the tunnel.
            let z = config.near + ctx.random() * depth * 0.5;
            positions.push(Vec3::new(x, y, z));
            colors.push(lerp_color(inside, outside, ctx.random()));
        }

        Ok(Self {
            config,
            positions,
            colors,
            warp_elapsed: None,
        })
    }

    /// Switch warp on or off. Turning it on restarts the ramp from cruise.
    pub fn set_warp(&mut self, active: bool) {
        match (active, self.warp_elapsed.is_some()) {
            (true, false) => {
                self.warp_elapsed = Some(0.0);
                log::debug!("starfield warp engaged");
            }
            (false, true) => self.warp_elapsed = None,
            _ => {}
        }
    }

    pub fn is_warping(&self) -> bool {
        self.warp_elapsed.is_some()
    }

    pub fn current_speed(&self) -> f32 {
        match self.warp_elapsed {
            Some(elapsed) => warp_speed(
                self.config.speed,
                self.config.max_speed,
                self.config.accel_duration,
                elapsed,
            ),
            None => self.config.speed,
        }
    }

    /// Move every star forward and recycle the ones past the far plane.
    pub fn update(&mut self, dt: f32, ctx: &mut SpawnContext) {
        let dt = dt.max(0.0);
        let advance = self.current_speed() * dt;
        for p in &mut self.positions {
            p.z += advance;
            if p.z > self.config.far {
                let (x, y) = ctx.random_in_square(self.config.half_extent);
                *p = Vec3::new(x, y, self.config.near);
            }
        }
        if let Some(elapsed) = self.warp_elapsed.as_mut() {
            *elapsed += dt;
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }
}
