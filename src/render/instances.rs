//! Per-frame point instances built from scene state.
//!
//! Everything on screen is an additive, round point sprite. World-space
//! points (stars, galaxy, comets) go through the orbit camera; overlay
//! points (intro title, particle title, orbital nodes) are in canvas pixels
//! with the origin top-left.

use crate::comet::Comet;
use crate::glyphs::BlockFont;
use crate::orbital::OrbitalMenu;
use crate::scene::GalaxyScene;
use crate::starfield::Starfield;
use crate::text_field::{title_font_px, ParticleField, TextRasterizer};
use crate::transition::GalaxyField;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};

/// Half-size of a star sprite, world units.
pub const STAR_SIZE: f32 = 0.03;
/// Comet heads are drawn this many times their simulated size.
pub const COMET_HEAD_SCALE: f32 = 4.0;
pub const COMET_COLOR: Vec3 = Vec3::new(0.75, 0.85, 1.0);
/// Half-size of an orbital node, canvas pixels.
pub const NODE_RADIUS: f32 = 10.0;
/// Pixel stride when sampling the intro title.
const INTRO_TITLE_STRIDE: u32 = 3;

/// One point sprite, laid out for an instance-step vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    /// Half-size of the sprite in view units.
    pub size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

impl PointInstance {
    pub fn new(position: Vec3, size: f32, color: Vec3, alpha: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
            color: color.to_array(),
            alpha,
        }
    }
}

pub fn push_starfield(starfield: &Starfield, out: &mut Vec<PointInstance>) {
    out.extend(
        starfield
            .positions()
            .iter()
            .zip(starfield.colors())
            .map(|(&p, &c)| PointInstance::new(p, STAR_SIZE, c, 1.0)),
    );
}

/// Galaxy points with the presentation transform applied.
pub fn push_galaxy(field: &GalaxyField, out: &mut Vec<PointInstance>) {
    let model = field.transform().model_matrix();
    let size = field.params().size;
    let cloud = field.cloud();
    out.extend(
        cloud
            .positions()
            .iter()
            .zip(cloud.colors())
            .map(|(&p, &c)| PointInstance::new(model.transform_point3(p), size, c, 1.0)),
    );
}

/// Comet heads plus their tapering trails.
pub fn push_comets(comets: &[Comet], out: &mut Vec<PointInstance>) {
    for comet in comets {
        let opacity = comet.opacity();
        if opacity <= 0.0 {
            continue;
        }
        out.push(PointInstance::new(
            comet.position(),
            comet.size() * COMET_HEAD_SCALE,
            COMET_COLOR,
            opacity,
        ));
        let Some(trail) = comet.trail() else {
            continue;
        };
        let len = trail.len().max(1) as f32;
        for (i, point) in trail.points().enumerate() {
            let fade = 1.0 - i as f32 / len;
            out.push(PointInstance::new(point, trail.width_at(i) * 0.5, COMET_COLOR, opacity * fade * 0.6));
        }
    }
}

pub fn push_title(field: &ParticleField, out: &mut Vec<PointInstance>) {
    out.extend(field.particles().iter().map(|p| {
        let color = Vec3::from_array(p.color.map(|c| c as f32 / 255.0));
        PointInstance::new(p.current.extend(0.0), p.current_radius, color, 1.0)
    }));
}

/// Orbital nodes centred on `center`, each with a soft energy halo.
pub fn push_orbital(menu: &OrbitalMenu, center: Vec2, out: &mut Vec<PointInstance>) {
    let mut views = menu.nodes();
    views.sort_by_key(|v| v.node.z_index);
    for view in views {
        let pos = (center + Vec2::new(view.node.x, view.node.y)).extend(0.0);
        let halo_alpha = if view.pulsing { 0.3 } else { 0.12 };
        out.push(PointInstance::new(
            pos,
            view.glow_diameter * 0.5,
            Vec3::new(0.6, 0.7, 1.0),
            halo_alpha * view.node.opacity,
        ));

        let (size, color) = if view.expanded {
            (NODE_RADIUS * 1.5, Vec3::ONE)
        } else if view.related {
            (NODE_RADIUS, Vec3::new(0.6, 0.8, 1.0))
        } else {
            (NODE_RADIUS, Vec3::new(0.8, 0.8, 0.9))
        };
        out.push(PointInstance::new(pos, size, color, view.node.opacity));
    }
}

/// Which orbital node, if any, lies under `pointer`.
pub fn hit_node(menu: &OrbitalMenu, center: Vec2, pointer: Vec2) -> Option<u32> {
    menu.nodes()
        .into_iter()
        .filter(|v| {
            let radius = if v.expanded { NODE_RADIUS * 3.0 } else { NODE_RADIUS * 2.0 };
            (center + Vec2::new(v.node.x, v.node.y)).distance(pointer) <= radius
        })
        .max_by_key(|v| v.node.z_index)
        .map(|v| v.node.id)
}

/// Intro title as a fixed set of canvas pixels, sampled once per resize.
#[derive(Debug, Clone, Default)]
pub struct IntroTitle {
    points: Vec<Vec2>,
    center: Vec2,
}

impl IntroTitle {
    pub fn new(text: &str, width: u32, height: u32) -> Self {
        Self::with_rasterizer(&BlockFont, text, width, height)
    }

    pub fn with_rasterizer(raster: &dyn TextRasterizer, text: &str, width: u32, height: u32) -> Self {
        let center = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
        if width == 0 || height == 0 {
            return Self { points: Vec::new(), center };
        }
        let mut canvas = RgbaImage::new(width, height);
        let font_px = title_font_px(width, height, text);
        raster.fill_text(&mut canvas, text, center, font_px, &|_, _| Rgba([255, 255, 255, 255]));

        let mut points = Vec::new();
        for y in (0..height).step_by(INTRO_TITLE_STRIDE as usize) {
            for x in (0..width).step_by(INTRO_TITLE_STRIDE as usize) {
                if canvas.get_pixel(x, y)[3] > 0 {
                    points.push(Vec2::new(x as f32, y as f32));
                }
            }
        }
        Self { points, center }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Emit the title scaled about its centre.
    pub fn push(&self, opacity: f32, scale: f32, out: &mut Vec<PointInstance>) {
        if opacity <= 0.0 {
            return;
        }
        let size = INTRO_TITLE_STRIDE as f32 * 0.6 * scale;
        out.extend(self.points.iter().map(|&p| {
            let pos = self.center + (p - self.center) * scale;
            PointInstance::new(pos.extend(0.0), size, Vec3::ONE, opacity)
        }));
    }
}

/// Instance lists for one frame, reused between frames.
#[derive(Debug, Default)]
pub struct FrameInstances {
    pub world: Vec<PointInstance>,
    pub overlay: Vec<PointInstance>,
}

impl FrameInstances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both lists from the scene. `orbital_center` is in canvas pixels.
    pub fn collect(&mut self, scene: &GalaxyScene, intro_title: &IntroTitle, orbital_center: Vec2) {
        self.world.clear();
        self.overlay.clear();

        let intro = scene.intro();
        if !intro.main_content_visible() {
            if intro.starfield_visible() {
                push_starfield(scene.starfield(), &mut self.world);
            }
            intro_title.push(intro.title_opacity(), intro.title_scale(), &mut self.overlay);
            return;
        }

        push_galaxy(scene.galaxy(), &mut self.world);
        push_comets(scene.comets().comets(), &mut self.world);
        push_title(scene.title(), &mut self.overlay);
        push_orbital(scene.menu(), orbital_center, &mut self.overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::intro::MemorySessionStore;
    use crate::orbital::{default_timeline, OrbitalConfig};
    use crate::spawn::SpawnContext;

    fn small_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.galaxy.count = 500;
        config.starfield.particle_count = 50;
        config
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
    }

    #[test]
    fn test_intro_shows_only_title() {
        let session = MemorySessionStore::new();
        let scene = GalaxyScene::new(small_config(), &session, SpawnContext::seeded(1)).unwrap();
        let title = IntroTitle::new("GALAXY", 600, 300);
        assert!(!title.is_empty());

        let mut frame = FrameInstances::new();
        frame.collect(&scene, &title, Vec2::new(300.0, 220.0));
        assert!(frame.world.is_empty());
        assert_eq!(frame.overlay.len(), title.len());
    }

    #[test]
    fn test_main_scene_instances() {
        let session = MemorySessionStore::visited();
        let mut scene = GalaxyScene::new(small_config(), &session, SpawnContext::seeded(2)).unwrap();
        scene.update(0.016);
        scene.attach_title(600, 300);

        let mut frame = FrameInstances::new();
        frame.collect(&scene, &IntroTitle::default(), Vec2::new(300.0, 220.0));
        assert_eq!(frame.world.len(), 500);
        let nodes = scene.menu().len() * 2;
        assert_eq!(frame.overlay.len(), scene.title().particles().len() + nodes);
    }

    #[test]
    fn test_galaxy_points_are_transformed() {
        let mut ctx = SpawnContext::seeded(3);
        let field = GalaxyField::new(small_config().galaxy, &mut ctx).unwrap();
        let mut out = Vec::new();
        push_galaxy(&field, &mut out);
        let offset = field.transform().offset_y;
        let mean_y = out.iter().map(|p| p.position[1]).sum::<f32>() / out.len() as f32;
        assert!((mean_y - offset).abs() < 1.0);
    }

    #[test]
    fn test_hit_node() {
        let menu = OrbitalMenu::new(default_timeline(), OrbitalConfig::default()).unwrap();
        let center = Vec2::new(400.0, 300.0);
        let node = menu.node_position(0).unwrap();
        let pointer = center + Vec2::new(node.x, node.y);
        assert_eq!(hit_node(&menu, center, pointer), Some(node.id));
        assert_eq!(hit_node(&menu, center, center), None);
    }

    #[test]
    fn test_intro_title_fades_out() {
        let title = IntroTitle::new("HI", 200, 100);
        let mut out = Vec::new();
        title.push(0.0, 1.0, &mut out);
        assert!(out.is_empty());
        title.push(1.0, 0.8, &mut out);
        assert_eq!(out.len(), title.len());
    }
}
