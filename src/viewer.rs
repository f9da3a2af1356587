//! Desktop viewer: a winit window driving a [`GalaxyScene`].
//!
//! Controls:
//! - click: dismiss the intro title, then select orbital nodes
//! - scroll: zoom
//! - `P`: morph to the next galaxy preset
//! - `Space`: pause
//! - `Escape`: quit

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::ViewerError;
use crate::galaxy::GalaxyParameters;
use crate::input::PointerInput;
use crate::intro::MemorySessionStore;
use crate::orbital::ClickTarget;
use crate::render::{hit_node, FrameInstances, IntroTitle, OrbitCamera, Renderer};
use crate::scene::GalaxyScene;
use crate::spawn::SpawnContext;
use crate::text_field::PointerMapper;
use crate::time::FrameClock;

/// Presets cycled with `P`.
const PRESET_CYCLE: [&str; 2] = ["spiral", "disk"];

/// Options that are not part of the scene config.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Seed for every random draw; entropy when `None`.
    pub seed: Option<u64>,
    pub window_title: String,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            seed: None,
            window_title: "Galaxy".to_string(),
        }
    }
}

/// Orbital menu centre for a canvas size.
fn orbital_center(width: u32, height: u32) -> Vec2 {
    Vec2::new(width as f32 * 0.5, height as f32 * 0.75)
}

struct App {
    options: ViewerOptions,
    scene: GalaxyScene,
    session: MemorySessionStore,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: OrbitCamera,
    intro_camera: OrbitCamera,
    clock: FrameClock,
    input: PointerInput,
    frame: FrameInstances,
    intro_title: IntroTitle,
    preset_index: usize,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: SceneConfig, options: ViewerOptions) -> Result<Self, ViewerError> {
        let ctx = match options.seed {
            Some(seed) => SpawnContext::seeded(seed),
            None => SpawnContext::from_entropy(),
        };
        let session = MemorySessionStore::new();
        let intro_camera = OrbitCamera::starfield(config.starfield.far);
        let scene = GalaxyScene::new(config, &session, ctx)?;
        Ok(Self {
            options,
            scene,
            session,
            window: None,
            renderer: None,
            camera: OrbitCamera::new(),
            intro_camera,
            clock: FrameClock::new(),
            input: PointerInput::new(),
            frame: FrameInstances::new(),
            intro_title: IntroTitle::default(),
            preset_index: 0,
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    /// Rebuild everything sized to the canvas.
    fn layout(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.input.set_window_size(width, height);
        self.intro_title = IntroTitle::new(&self.scene.config().title, width, height);
        let sampled = self.scene.attach_title(width, height);
        log::debug!("layout {width}x{height}: {sampled} title particles");
    }

    fn handle_click(&mut self) {
        if self.scene.enter(&mut self.session) {
            return;
        }
        if !self.scene.intro().main_content_visible() {
            return;
        }
        let (width, height) = self.input.window_size();
        let target = self
            .input
            .position()
            .and_then(|p| hit_node(self.scene.menu(), orbital_center(width, height), p))
            .map_or(ClickTarget::Background, ClickTarget::Node);
        self.scene.click(target);
    }

    fn handle_key(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Named(NamedKey::Space) => {
                self.clock.toggle_pause();
                log::info!("paused: {}", self.clock.is_paused());
            }
            Key::Character(c) if c.eq_ignore_ascii_case("p") => self.next_preset(),
            _ => {}
        }
    }

    fn next_preset(&mut self) {
        self.preset_index = (self.preset_index + 1) % PRESET_CYCLE.len();
        let name = PRESET_CYCLE[self.preset_index];
        let count = self.scene.config().galaxy.count;
        let Some(params) = GalaxyParameters::preset(name) else {
            return;
        };
        match self.scene.transition_to_preset(params.with_count(count)) {
            Ok(()) => log::info!("morphing to preset `{name}`"),
            Err(err) => log::warn!("preset `{name}` rejected: {err}"),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.update();

        if self.input.clicked() {
            self.handle_click();
        }
        let (width, height) = self.input.window_size();
        let mapper = PointerMapper::new(
            Vec2::new(width as f32, height as f32),
            Vec2::ZERO,
            Vec2::new(width as f32, height as f32),
        );
        if self.input.left() {
            self.scene.pointer_left();
        } else {
            self.scene
                .pointer_moved(self.input.position().and_then(|p| mapper.to_canvas(p)));
        }

        self.scene.update(dt);
        self.camera.update(dt);
        self.frame
            .collect(&self.scene, &self.intro_title, orbital_center(width, height));

        let camera = if self.scene.intro().main_content_visible() {
            &self.camera
        } else {
            &self.intro_camera
        };
        let glow = self.scene.bloom().intensity;

        if let Some(renderer) = &mut self.renderer {
            match renderer.render(camera, &self.frame, glow) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {e:?}"),
            }
        }
        self.input.begin_frame();

        if self.clock.frame() % 600 == 0 {
            log::debug!(
                "{:.0} fps, {} comets, bloom {:.2}",
                self.clock.fps(),
                self.scene.comets().active_count(),
                glow
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(err) => return self.fail(event_loop, err.into()),
        };
        let (width, height) = renderer.size();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.layout(width, height);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                self.layout(physical_size.width, physical_size.height);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.distance = (self.camera.distance - scroll * 0.5).clamp(3.0, 40.0);
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event, event_loop),
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.scene.teardown();
    }
}

/// Open a window and run the scene until it is closed.
pub fn run(config: SceneConfig, options: ViewerOptions) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, options)?;
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbital_center_below_title() {
        let center = orbital_center(800, 600);
        assert_eq!(center, Vec2::new(400.0, 450.0));
    }

    #[test]
    fn test_preset_cycle_names_resolve() {
        for name in PRESET_CYCLE {
            assert!(GalaxyParameters::preset(name).is_some(), "{name}");
        }
    }
}
