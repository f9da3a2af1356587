//! # Galaxy Scene
//!
//! A galaxy landing scene: a procedurally generated spiral galaxy point
//! cloud, comets that arc into its core and flash the bloom on impact, a
//! warp-speed starfield intro, a rotating orbital timeline menu and a title
//! made of pointer-repelled particles.
//!
//! Every component is a frame-driven state machine. The host calls
//! `update(dt)` once per frame and reads positions, colours and flags back
//! out; nothing here owns a clock or a thread. The bundled [`viewer`] is one
//! such host, drawing the scene with wgpu.
//!
//! ## Quick Start
//!
//! ```ignore
//! use galaxy_scene::prelude::*;
//!
//! let session = MemorySessionStore::new();
//! let mut scene = GalaxyScene::new(SceneConfig::default(), &session, SpawnContext::seeded(7))?;
//!
//! // In the frame loop:
//! for event in scene.update(dt) {
//!     if let CometEvent::Impact(id) = event {
//!         log::debug!("comet {id:?} hit the core");
//!     }
//! }
//! let bloom = scene.bloom();
//! ```
//!
//! ## Components
//!
//! - [`galaxy`]: spiral and disk point clouds, and their presentation transform
//! - [`transition`]: morphing one galaxy preset into another
//! - [`comet`] and [`scheduler`]: Bezier comets and their batch spawner
//! - [`glow`]: the shared bloom pulse comets trigger on impact
//! - [`starfield`] and [`intro`]: the intro title, warp and reveal
//! - [`orbital`]: the rotating timeline menu
//! - [`text_field`] and [`glyphs`]: the particle title
//! - [`config`] and [`quality`]: RON scene files and device budgets
//!
//! ## Determinism
//!
//! All randomness flows through a [`SpawnContext`]. Seed it and a scene
//! replays identically for the same sequence of `dt` values.

pub mod comet;
pub mod config;
pub mod easing;
pub mod error;
pub mod galaxy;
pub mod glow;
pub mod glyphs;
pub mod input;
pub mod intro;
pub mod orbital;
pub mod quality;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod spawn;
pub mod starfield;
pub mod text_field;
pub mod time;
pub mod timer;
pub mod transition;
pub mod viewer;
pub mod visuals;

pub use glam::{Mat4, Vec2, Vec3};
pub use spawn::SpawnContext;

/// Convenient re-exports for hosts.
pub mod prelude {
    pub use crate::comet::{Comet, CometEvent, CometId, CometStatus};
    pub use crate::config::SceneConfig;
    pub use crate::error::{ConfigError, GpuError, PresetError, ViewerError};
    pub use crate::galaxy::{GalaxyParameters, GalaxyShape, ParticleSystem};
    pub use crate::glow::{BloomSettings, GlowPulse};
    pub use crate::intro::{AnimationPhase, IntroSequence, MemorySessionStore, SessionStore};
    pub use crate::orbital::{ClickTarget, ItemStatus, OrbitalItem, OrbitalMenu};
    pub use crate::quality::{DeviceTier, QualitySettings};
    pub use crate::scene::GalaxyScene;
    pub use crate::scheduler::{CometScheduler, SchedulerConfig};
    pub use crate::spawn::SpawnContext;
    pub use crate::starfield::Starfield;
    pub use crate::text_field::{ParticleField, TextRasterizer};
    pub use crate::time::FrameClock;
    pub use crate::transition::GalaxyField;
    pub use crate::{Mat4, Vec2, Vec3};
}
