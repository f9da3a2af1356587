//! Smooth changes between galaxy presets.
//!
//! A transition never regenerates mid-flight. The target cloud is generated
//! once up front and every frame each live particle is mixed between its
//! starting value and its target value with a cosine ease. When the window
//! closes the live buffer is overwritten with the target so no float drift
//! survives the lerp.

use crate::easing::ease_in_out_cosine;
use crate::error::ConfigError;
use crate::galaxy::{generate, GalaxyParameters, GalaxyTransform, ParticleSystem};
use crate::spawn::SpawnContext;

/// Default preset transition window, seconds.
pub const DEFAULT_TRANSITION_SECS: f32 = 8.0;

/// An in-flight interpolation from one cloud to another.
#[derive(Debug, Clone)]
pub struct PresetTransition {
    from: ParticleSystem,
    to: ParticleSystem,
    live: ParticleSystem,
    duration: f32,
    elapsed: f32,
    complete: bool,
}

impl PresetTransition {
    /// Start a transition lasting `duration` seconds.
    ///
    /// If the clouds differ in size the source is resized to the target:
    /// surplus particles are dropped and new ones start at their target.
    pub fn new(from: ParticleSystem, to: ParticleSystem, duration: f32) -> Result<Self, ConfigError> {
        validate_duration(duration)?;

        let mut from = from;
        let n = to.len();
        from.positions.truncate(n);
        from.colors.truncate(n);
        let have = from.len();
        from.positions.extend_from_slice(&to.positions[have..]);
        from.colors.extend_from_slice(&to.colors[have..]);

        Ok(Self {
            live: from.clone(),
            from,
            to,
            duration,
            elapsed: 0.0,
            complete: false,
        })
    }

    /// Advance by `dt` seconds and return the live buffer.
    pub fn advance(&mut self, dt: f32) -> &ParticleSystem {
        if self.complete {
            return &self.live;
        }
        self.elapsed += dt.max(0.0);

        if self.elapsed >= self.duration {
            self.live.positions.copy_from_slice(&self.to.positions);
            self.live.colors.copy_from_slice(&self.to.colors);
            self.complete = true;
            return &self.live;
        }

        let t = ease_in_out_cosine(self.elapsed / self.duration);
        for i in 0..self.live.len() {
            self.live.positions[i] = self.from.positions[i].lerp(self.to.positions[i], t);
            self.live.colors[i] = self.from.colors[i].lerp(self.to.colors[i], t);
        }
        &self.live
    }

    /// Whether the live buffer has been snapped to the target.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Linear progress through the window, `0..=1`.
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    /// Current interpolated cloud.
    #[inline]
    pub fn live(&self) -> &ParticleSystem {
        &self.live
    }

    /// The cloud being transitioned to.
    #[inline]
    pub fn target(&self) -> &ParticleSystem {
        &self.to
    }

    fn into_live(self) -> ParticleSystem {
        self.live
    }
}

fn validate_duration(duration: f32) -> Result<(), ConfigError> {
    if !duration.is_finite() {
        return Err(ConfigError::NotFinite("transition duration"));
    }
    if duration <= 0.0 {
        return Err(ConfigError::NonPositiveDuration { what: "transition", value: duration });
    }
    Ok(())
}

/// The galaxy currently on screen, plus any transition in progress.
#[derive(Debug, Clone)]
pub struct GalaxyField {
    params: GalaxyParameters,
    cloud: ParticleSystem,
    transform: GalaxyTransform,
    transition: Option<PresetTransition>,
}

impl GalaxyField {
    /// Generate the initial cloud.
    pub fn new(params: GalaxyParameters, ctx: &mut SpawnContext) -> Result<Self, ConfigError> {
        let cloud = generate(&params, ctx)?;
        Ok(Self {
            transform: GalaxyTransform::for_params(&params),
            params,
            cloud,
            transition: None,
        })
    }

    /// Throw away the current cloud and generate a new one immediately.
    pub fn regenerate(&mut self, params: GalaxyParameters, ctx: &mut SpawnContext) -> Result<(), ConfigError> {
        let cloud = generate(&params, ctx)?;
        log::info!("galaxy regenerated with {} particles", cloud.len());
        self.transform.rotation_x = GalaxyTransform::for_params(&params).rotation_x;
        self.params = params;
        self.cloud = cloud;
        self.transition = None;
        Ok(())
    }

    /// Morph toward a new preset over `duration` seconds.
    ///
    /// Starting a transition while one is running continues from the
    /// current live buffer.
    pub fn transition_to(
        &mut self,
        params: GalaxyParameters,
        duration: f32,
        ctx: &mut SpawnContext,
    ) -> Result<(), ConfigError> {
        validate_duration(duration)?;
        let target = generate(&params, ctx)?;
        let from = match self.transition.take() {
            Some(running) => running.into_live(),
            None => std::mem::take(&mut self.cloud),
        };
        let transition = PresetTransition::new(from, target, duration)?;
        log::info!(
            "galaxy transition to {:?} preset over {duration:.1}s ({} particles)",
            params.shape,
            transition.target().len()
        );
        self.cloud = transition.live().clone();
        self.transform.rotation_x = GalaxyTransform::for_params(&params).rotation_x;
        self.params = params;
        self.transition = Some(transition);
        Ok(())
    }

    /// Per-frame update: spin and any running transition.
    pub fn update(&mut self, dt: f32) {
        self.transform.update(dt);
        let finished = match self.transition.as_mut() {
            Some(transition) => {
                let live = transition.advance(dt);
                self.cloud.positions.copy_from_slice(&live.positions);
                self.cloud.colors.copy_from_slice(&live.colors);
                transition.is_complete()
            }
            None => false,
        };
        if finished {
            self.transition = None;
            log::debug!("galaxy transition complete");
        }
    }

    /// The cloud to render this frame.
    #[inline]
    pub fn cloud(&self) -> &ParticleSystem {
        &self.cloud
    }

    /// Parameters of the current (or target) preset.
    #[inline]
    pub fn params(&self) -> &GalaxyParameters {
        &self.params
    }

    /// Presentation transform.
    #[inline]
    pub fn transform(&self) -> &GalaxyTransform {
        &self.transform
    }

    /// Whether a transition is running.
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::GalaxyShape;
    use glam::Vec3;

    fn cloud(values: &[f32]) -> ParticleSystem {
        let positions = values.iter().map(|v| Vec3::splat(*v)).collect::<Vec<_>>();
        ParticleSystem::from_parts(positions.clone(), positions).unwrap()
    }

    #[test]
    fn test_midpoint_and_snap() {
        let mut t = PresetTransition::new(cloud(&[0.0, 10.0]), cloud(&[4.0, 20.0]), 8.0).unwrap();

        let live = t.advance(4.0);
        assert!((live.positions()[0] - Vec3::splat(2.0)).length() < 1e-5);
        assert!((live.positions()[1] - Vec3::splat(15.0)).length() < 1e-4);

        let live = t.advance(4.0).clone();
        assert!(t.is_complete());
        assert_eq!(live.positions(), t.target().positions());
        assert_eq!(live.colors(), t.target().colors());
    }

    #[test]
    fn test_overshoot_snaps_exactly() {
        let mut t = PresetTransition::new(cloud(&[0.1]), cloud(&[0.7]), 1.0).unwrap();
        t.advance(0.3);
        t.advance(5.0);
        assert_eq!(t.live().positions()[0], Vec3::splat(0.7));
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_resizes_to_target() {
        let mut t = PresetTransition::new(cloud(&[1.0]), cloud(&[2.0, 3.0, 4.0]), 1.0).unwrap();
        assert_eq!(t.live().len(), 3);
        assert_eq!(t.live().positions()[2], Vec3::splat(4.0));
        t.advance(1.0);
        assert_eq!(t.live().len(), 3);
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(PresetTransition::new(cloud(&[0.0]), cloud(&[1.0]), 0.0).is_err());
    }

    #[test]
    fn test_field_transition_lifecycle() {
        let mut ctx = SpawnContext::seeded(11);
        let spiral = GalaxyParameters::default().with_count(500);
        let disk = GalaxyParameters::accretion_disk().with_count(500);
        let mut field = GalaxyField::new(spiral, &mut ctx).unwrap();

        field.transition_to(disk, 2.0, &mut ctx).unwrap();
        assert!(field.is_transitioning());
        assert_eq!(field.params().shape, GalaxyShape::Disk);

        for _ in 0..30 {
            field.update(0.1);
        }
        assert!(!field.is_transitioning());
        assert_eq!(field.cloud().len(), 500);
    }

    #[test]
    fn test_field_regenerate_cancels_transition() {
        let mut ctx = SpawnContext::seeded(12);
        let mut field = GalaxyField::new(GalaxyParameters::default().with_count(100), &mut ctx).unwrap();
        field
            .transition_to(GalaxyParameters::accretion_disk().with_count(100), 5.0, &mut ctx)
            .unwrap();
        field
            .regenerate(GalaxyParameters::default().with_count(50), &mut ctx)
            .unwrap();
        assert!(!field.is_transitioning());
        assert_eq!(field.cloud().len(), 50);
    }
}
