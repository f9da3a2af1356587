//! Scene configuration.
//!
//! Every component config lives here so a whole scene can be described in
//! one RON file:
//!
//! ```ron
//! (
//!     tier: tablet,
//!     galaxy: (count: 80000, branches: 3, spin: 2.0),
//!     scheduler: (interval: 10.0),
//!     title: "GALAXY",
//! )
//! ```
//!
//! Missing fields take their defaults, which reproduce the landing page.
//! [`SceneConfig::apply_quality`] then folds the tier budgets into the
//! component configs.

use crate::error::{ConfigError, PresetError};
use crate::galaxy::GalaxyParameters;
use crate::intro::IntroTimings;
use crate::orbital::OrbitalConfig;
use crate::quality::{DeviceTier, QualitySettings};
use crate::scheduler::SchedulerConfig;
use crate::starfield::StarfieldConfig;
use crate::text_field::TextFieldConfig;
use crate::transition::DEFAULT_TRANSITION_SECS;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub tier: DeviceTier,
    /// Explicit budgets; when absent the tier defaults are used.
    pub quality: Option<QualitySettings>,
    pub galaxy: GalaxyParameters,
    pub scheduler: SchedulerConfig,
    pub starfield: StarfieldConfig,
    pub orbital: OrbitalConfig,
    pub intro: IntroTimings,
    pub text: TextFieldConfig,
    /// Particle title text.
    pub title: String,
    pub subtitle: String,
    /// Preset transition window, seconds.
    pub transition_secs: f32,
    /// Bloom intensity at the peak of an impact pulse.
    pub glow_peak: f32,
    /// Seconds an impact pulse holds before dropping back.
    pub glow_hold: f32,
    /// Skip the intro even on a first visit.
    pub skip_intro: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tier: DeviceTier::Desktop,
            quality: None,
            galaxy: GalaxyParameters::default(),
            scheduler: SchedulerConfig::default(),
            starfield: StarfieldConfig::default(),
            orbital: OrbitalConfig::default(),
            intro: IntroTimings::default(),
            text: TextFieldConfig::default(),
            title: "GALAXY".to_string(),
            subtitle: "TOUCH TO EXPLORE".to_string(),
            transition_secs: DEFAULT_TRANSITION_SECS,
            glow_peak: 5.0,
            glow_hold: 0.25,
            skip_intro: false,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, PresetError> {
        let config: SceneConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&source)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    pub fn with_tier(mut self, tier: DeviceTier) -> Self {
        self.tier = tier;
        self
    }

    /// The budgets in effect.
    pub fn quality_settings(&self) -> QualitySettings {
        self.quality.unwrap_or_else(|| QualitySettings::for_tier(self.tier))
    }

    /// Fold the quality budgets into the component configs.
    pub fn apply_quality(&mut self) {
        let q = self.quality_settings();
        self.galaxy.count = q.galaxy_particles;
        self.galaxy.bloom_intensity = q.bloom_intensity;
        self.starfield.particle_count = q.starfield_particles;
        self.scheduler.batch_size = q.comet_count;
        self.text.density = q.particle_density.max(1);
        log::debug!("applied {} quality: {q:?}", self.tier);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.galaxy.validate()?;
        self.scheduler.validate()?;
        self.starfield.validate()?;
        if !self.transition_secs.is_finite() {
            return Err(ConfigError::NotFinite("transition_secs"));
        }
        if self.transition_secs <= 0.0 {
            return Err(ConfigError::NonPositiveDuration { what: "transition", value: self.transition_secs });
        }
        let t = self.intro;
        if [t.text_fade, t.warp, t.reveal_delay, self.glow_hold, self.glow_peak]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(ConfigError::NotFinite("intro or glow timing"));
        }
        Ok(())
    }
}
