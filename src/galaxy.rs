//! Procedural galaxy point clouds.
//!
//! A galaxy is a fixed-size cloud of coloured points generated in one pass
//! from [`GalaxyParameters`]. Changing any parameter means generating a new
//! cloud; clouds are never patched in place. Smooth changes between presets
//! are handled by [`PresetTransition`](crate::transition::PresetTransition).
//!
//! # Shapes
//!
//! | Shape | Layout |
//! |-------|--------|
//! | [`GalaxyShape::Spiral`] | `branches` arms twisted by `spin`, jittered per axis |
//! | [`GalaxyShape::Disk`] | flat accretion disk with thickness growing outward |
//!
//! In both shapes a particle's colour mixes from `inside_color` at the core
//! to `outside_color` at the rim, keyed by its drawn radius.

use crate::error::ConfigError;
use crate::spawn::SpawnContext;
use crate::visuals::{lerp_color, parse_hex_color};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Half-thickness of a disk galaxy relative to the drawn radius.
pub const DISK_THICKNESS: f32 = 0.1;

/// Default tilt applied to the galaxy when presenting it.
pub const DEFAULT_TILT: f32 = -0.4;

/// Arrangement of the generated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GalaxyShape {
    /// Logarithmic-looking spiral arms.
    #[default]
    Spiral,
    /// Thin disk, uniform in angle.
    Disk,
}

/// Inputs for one galaxy generation.
///
/// Immutable per generation: switching presets builds a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParameters {
    /// Number of particles.
    pub count: u32,
    /// Rendered point size.
    pub size: f32,
    /// Maximum drawn radius (`radius_max`).
    pub radius: f32,
    /// Number of spiral arms. Must be at least 1.
    pub branches: u32,
    /// Twist per unit radius, in radians.
    pub spin: f32,
    /// Jitter scale relative to the drawn radius.
    pub randomness: f32,
    /// Exponent biasing jitter toward the arm centreline.
    pub randomness_power: f32,
    /// Core colour, hex.
    pub inside_color: String,
    /// Rim colour, hex.
    pub outside_color: String,
    /// Layout.
    pub shape: GalaxyShape,
    /// Optional presentation tilt override, radians.
    pub rotation_x: Option<f32>,
    /// Baseline bloom for this preset.
    pub bloom_intensity: f32,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 200_000,
            size: 0.015,
            radius: 10.0,
            branches: 5,
            spin: 1.5,
            randomness: 0.5,
            randomness_power: 3.0,
            inside_color: "#ff6030".to_string(),
            outside_color: "#1b3984".to_string(),
            shape: GalaxyShape::Spiral,
            rotation_x: None,
            bloom_intensity: 1.2,
        }
    }
}

impl GalaxyParameters {
    /// Accretion-disk preset: a smaller, flat, hotter disk.
    pub fn accretion_disk() -> Self {
        Self {
            count: 120_000,
            size: 0.02,
            radius: 6.0,
            branches: 1,
            spin: 0.0,
            randomness: 0.0,
            randomness_power: 1.0,
            inside_color: "#ffd9a0".to_string(),
            outside_color: "#5a2d82".to_string(),
            shape: GalaxyShape::Disk,
            rotation_x: Some(-0.2),
            bloom_intensity: 1.6,
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "spiral" => Some(Self::default()),
            "disk" | "accretion" => Some(Self::accretion_disk()),
            _ => None,
        }
    }

    /// Set the particle count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the shape.
    pub fn with_shape(mut self, shape: GalaxyShape) -> Self {
        self.shape = shape;
        self
    }

    /// Check the caller contract: `branches >= 1`, `radius > 0`, finite
    /// floats and parseable colours.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branches == 0 {
            return Err(ConfigError::NoBranches(self.branches));
        }
        if !self.radius.is_finite() {
            return Err(ConfigError::NotFinite("radius"));
        }
        if self.radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        for (name, value) in [
            ("size", self.size),
            ("spin", self.spin),
            ("randomness", self.randomness),
            ("randomness_power", self.randomness_power),
            ("bloom_intensity", self.bloom_intensity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        parse_hex_color(&self.inside_color)?;
        parse_hex_color(&self.outside_color)?;
        Ok(())
    }
}

/// Positions and colours of one cloud.
///
/// Both buffers always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleSystem {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) colors: Vec<Vec3>,
}

impl ParticleSystem {
    /// Empty cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from matching buffers. Returns `None` on a length mismatch.
    pub fn from_parts(positions: Vec<Vec3>, colors: Vec<Vec3>) -> Option<Self> {
        (positions.len() == colors.len()).then_some(Self { positions, colors })
    }

    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        }
    }

    #[inline]
    fn push(&mut self, position: Vec3, color: Vec3) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the cloud has no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Particle positions.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Particle colours.
    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
}

/// Generate a new cloud. This is always a full rebuild.
pub fn generate(
    params: &GalaxyParameters,
    ctx: &mut SpawnContext,
) -> Result<ParticleSystem, ConfigError> {
    params.validate()?;
    let inside = parse_hex_color(&params.inside_color)?;
    let outside = parse_hex_color(&params.outside_color)?;

    let mut system = ParticleSystem::with_capacity(params.count as usize);
    for i in 0..params.count {
        let radius = ctx.random() * params.radius;
        let position = match params.shape {
            GalaxyShape::Spiral => spiral_position(i, radius, params, ctx),
            GalaxyShape::Disk => disk_position(radius, ctx),
        };
        system.push(position, lerp_color(inside, outside, radius / params.radius));
    }

    log::debug!(
        "generated {:?} galaxy: {} particles, radius {}",
        params.shape,
        system.len(),
        params.radius
    );
    Ok(system)
}

fn spiral_position(index: u32, radius: f32, params: &GalaxyParameters, ctx: &mut SpawnContext) -> Vec3 {
    let spin_angle = radius * params.spin;
    let branch_angle = (index % params.branches) as f32 / params.branches as f32 * TAU;
    let angle = branch_angle + spin_angle;

    let mut jitter = || {
        ctx.random().powf(params.randomness_power) * ctx.random_sign() * params.randomness * radius
    };
    let offset = Vec3::new(jitter(), jitter(), jitter());

    // Jitter near the rim can push a point outside the nominal radius.
    (Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius) + offset)
        .clamp_length_max(params.radius)
}

fn disk_position(radius: f32, ctx: &mut SpawnContext) -> Vec3 {
    let angle = ctx.random() * TAU;
    let y = (ctx.random() * 2.0 - 1.0) * DISK_THICKNESS * radius;
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Presentation transform of the galaxy: fixed tilt, fixed drop, slow spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyTransform {
    /// Tilt around X, radians.
    pub rotation_x: f32,
    /// Accumulated spin around Y, radians.
    pub rotation_y: f32,
    /// Vertical offset.
    pub offset_y: f32,
    /// Spin speed, radians per second.
    pub spin_speed: f32,
}

impl Default for GalaxyTransform {
    fn default() -> Self {
        Self {
            rotation_x: DEFAULT_TILT,
            rotation_y: 0.0,
            offset_y: -2.0,
            spin_speed: 0.05,
        }
    }
}

impl GalaxyTransform {
    /// Transform for a preset, honouring its tilt override.
    pub fn for_params(params: &GalaxyParameters) -> Self {
        Self {
            rotation_x: params.rotation_x.unwrap_or(DEFAULT_TILT),
            ..Self::default()
        }
    }

    /// Advance the spin.
    pub fn update(&mut self, dt: f32) {
        self.rotation_y = (self.rotation_y + dt * self.spin_speed) % TAU;
    }

    /// Object-to-world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.offset_y, 0.0))
            * Mat4::from_rotation_x(self.rotation_x)
            * Mat4::from_rotation_y(self.rotation_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(shape: GalaxyShape) -> GalaxyParameters {
        GalaxyParameters::default().with_count(5_000).with_shape(shape)
    }

    #[test]
    fn test_buffers_match_count() {
        let mut ctx = SpawnContext::seeded(1);
        let cloud = generate(&small(GalaxyShape::Spiral), &mut ctx).unwrap();
        assert_eq!(cloud.len(), 5_000);
        assert_eq!(cloud.positions().len(), cloud.colors().len());
    }

    #[test]
    fn test_spiral_within_radius() {
        let params = small(GalaxyShape::Spiral);
        let mut ctx = SpawnContext::seeded(2);
        let cloud = generate(&params, &mut ctx).unwrap();
        for p in cloud.positions() {
            assert!(p.length() <= params.radius + 1e-4, "{p} outside radius");
        }
    }

    #[test]
    fn test_disk_thickness_bounded() {
        let params = small(GalaxyShape::Disk);
        let mut ctx = SpawnContext::seeded(3);
        let cloud = generate(&params, &mut ctx).unwrap();
        for p in cloud.positions() {
            assert!(p.y.abs() <= DISK_THICKNESS * params.radius + 1e-5);
        }
    }

    #[test]
    fn test_empty_cloud_is_valid() {
        let mut ctx = SpawnContext::seeded(4);
        let cloud = generate(&GalaxyParameters::default().with_count(0), &mut ctx).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let mut ctx = SpawnContext::seeded(5);
        let no_arms = GalaxyParameters { branches: 0, ..small(GalaxyShape::Spiral) };
        assert_eq!(generate(&no_arms, &mut ctx), Err(ConfigError::NoBranches(0)));

        let flat = GalaxyParameters { radius: 0.0, ..small(GalaxyShape::Spiral) };
        assert_eq!(generate(&flat, &mut ctx), Err(ConfigError::NonPositiveRadius(0.0)));

        let bad_color = GalaxyParameters { inside_color: "nope".into(), ..small(GalaxyShape::Spiral) };
        assert!(matches!(generate(&bad_color, &mut ctx), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_color_tracks_radius() {
        // No jitter, one arm: the drawn radius equals the distance in XZ.
        let params = GalaxyParameters {
            count: 2_000,
            branches: 1,
            randomness: 0.0,
            ..GalaxyParameters::default()
        };
        let inside = parse_hex_color(&params.inside_color).unwrap();
        let outside = parse_hex_color(&params.outside_color).unwrap();
        let mut ctx = SpawnContext::seeded(6);
        let cloud = generate(&params, &mut ctx).unwrap();

        for (p, c) in cloud.positions().iter().zip(cloud.colors()) {
            let expected = inside.lerp(outside, p.length() / params.radius);
            assert!((*c - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_transform_spins() {
        let mut t = GalaxyTransform::default();
        t.update(2.0);
        assert!((t.rotation_y - 0.1).abs() < 1e-6);
        let origin = t.model_matrix().transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, -2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(GalaxyParameters::preset("disk").unwrap().shape, GalaxyShape::Disk);
        assert!(GalaxyParameters::preset("nebula").is_none());
    }
}
