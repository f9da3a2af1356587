//! The whole landing scene, driven one frame at a time.
//!
//! [`GalaxyScene`] owns every component and decides which of them run in a
//! given frame:
//!
//! | Phase | Running |
//! |-------|---------|
//! | intro title | nothing but the intro timers |
//! | text fading / warping | intro + starfield |
//! | main content visible | galaxy, comets, glow, orbital menu, particle title |
//!
//! The host feeds it frame deltas, pointer positions and clicks, and reads
//! the per-frame buffers back out for rendering.

use crate::comet::CometEvent;
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::galaxy::GalaxyParameters;
use crate::glow::{BloomSettings, GlowPulse};
use crate::glyphs::BlockFont;
use crate::intro::{IntroSequence, SessionStore};
use crate::orbital::{default_timeline, ClickTarget, OrbitalItem, OrbitalMenu};
use crate::scheduler::CometScheduler;
use crate::spawn::SpawnContext;
use crate::starfield::Starfield;
use crate::text_field::{ParticleField, TextRasterizer};
use crate::transition::GalaxyField;
use glam::Vec2;

pub struct GalaxyScene {
    config: SceneConfig,
    ctx: SpawnContext,
    intro: IntroSequence,
    starfield: Starfield,
    galaxy: GalaxyField,
    comets: CometScheduler,
    glow: GlowPulse,
    menu: OrbitalMenu,
    title: ParticleField,
    raster: Box<dyn TextRasterizer>,
}

impl GalaxyScene {
    /// Build a scene with the default timeline and the block font.
    pub fn new(config: SceneConfig, session: &dyn SessionStore, ctx: SpawnContext) -> Result<Self, ConfigError> {
        Self::with_parts(config, session, ctx, default_timeline(), Box::new(BlockFont))
    }

    pub fn with_parts(
        config: SceneConfig,
        session: &dyn SessionStore,
        mut ctx: SpawnContext,
        items: Vec<OrbitalItem>,
        raster: Box<dyn TextRasterizer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let intro = if config.skip_intro {
            IntroSequence::skipped(config.intro)
        } else {
            IntroSequence::mount(session, config.intro)
        };
        let starfield = Starfield::new(config.starfield.clone(), &mut ctx)?;
        let galaxy = GalaxyField::new(config.galaxy.clone(), &mut ctx)?;
        let comets = CometScheduler::new(config.scheduler.clone())?;
        let glow = GlowPulse::new(config.galaxy.bloom_intensity, config.glow_peak, config.glow_hold);
        let menu = OrbitalMenu::new(items, config.orbital.clone())?;
        let title = ParticleField::new(config.text.clone())?;

        log::info!(
            "scene ready: {} galaxy particles, {} stars, intro {:?}",
            galaxy.cloud().len(),
            starfield.len(),
            intro.phase()
        );

        Ok(Self {
            config,
            ctx,
            intro,
            starfield,
            galaxy,
            comets,
            glow,
            menu,
            title,
            raster,
        })
    }

    /// Advance everything that is on screen by `dt` seconds and return the
    /// comet events of this frame.
    pub fn update(&mut self, dt: f32) -> Vec<CometEvent> {
        let was_visible = self.intro.main_content_visible();
        self.intro.update(dt);

        if self.intro.starfield_visible() {
            self.starfield.set_warp(self.intro.starfield_warp_active());
            self.starfield.update(dt, &mut self.ctx);
        }

        if !self.intro.main_content_visible() {
            return Vec::new();
        }
        if !was_visible {
            log::debug!("main content visible, starting galaxy scene");
        }
        if !self.comets.is_running() {
            self.comets.start();
        }

        self.galaxy.update(dt);
        self.glow.update(dt);
        let events = self.comets.update(dt, &mut self.ctx, &mut self.glow);
        self.menu.update(dt);
        self.title.step();
        events
    }

    /// Dismiss the intro title.
    pub fn enter(&mut self, session: &mut dyn SessionStore) -> bool {
        self.intro.enter(session)
    }

    /// Give the particle title a surface and sample the configured text.
    pub fn attach_title(&mut self, width: u32, height: u32) -> usize {
        self.title.attach(width, height);
        self.title
            .set_text(&self.config.title, &self.config.subtitle, self.raster.as_ref(), &mut self.ctx)
    }

    pub fn detach_title(&mut self) {
        self.title.detach();
    }

    /// Pointer position over the title surface, in its canvas pixels.
    pub fn pointer_moved(&mut self, canvas_pos: Option<Vec2>) {
        self.title.set_pointer(canvas_pos);
    }

    pub fn pointer_left(&mut self) {
        self.title.pointer_leave();
    }

    /// Route a click to the orbital menu. Ignored until the main content
    /// is visible.
    pub fn click(&mut self, target: ClickTarget) -> bool {
        if !self.intro.main_content_visible() {
            return false;
        }
        self.menu.click(target)
    }

    /// Morph the galaxy to another preset over the configured window.
    pub fn transition_to_preset(&mut self, params: GalaxyParameters) -> Result<(), ConfigError> {
        let bloom = params.bloom_intensity;
        self.galaxy
            .transition_to(params, self.config.transition_secs, &mut self.ctx)?;
        self.glow.set_baseline(bloom);
        Ok(())
    }

    /// Bloom for this frame: the intro's while it runs, the impact glow after.
    pub fn bloom(&self) -> BloomSettings {
        if self.intro.main_content_visible() {
            self.glow.bloom()
        } else {
            self.intro.intro_bloom()
        }
    }

    /// Cancel every timer and drop transient state.
    pub fn teardown(&mut self) {
        self.comets.teardown();
        self.intro.teardown();
        self.title.detach();
        log::info!("scene torn down");
    }

    /// Timers still pending across all components.
    pub fn pending_timers(&self) -> usize {
        self.comets.pending_timers() + self.intro.pending_timers()
    }

    pub fn intro(&self) -> &IntroSequence {
        &self.intro
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn galaxy(&self) -> &GalaxyField {
        &self.galaxy
    }

    pub fn comets(&self) -> &CometScheduler {
        &self.comets
    }

    pub fn glow(&self) -> &GlowPulse {
        &self.glow
    }

    pub fn menu(&self) -> &OrbitalMenu {
        &self.menu
    }

    pub fn title(&self) -> &ParticleField {
        &self.title
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

impl Drop for GalaxyScene {
    fn drop(&mut self) {
        self.teardown();
    }
}
