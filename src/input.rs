//! Pointer input from winit window events.
//!
//! The scene only cares about a single pointer: where it is, whether it
//! left the window, and whether the left button went down this frame.
//! [`PointerInput`] collects that from raw events and the viewer reads it
//! once per frame.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

#[derive(Debug, Default, Clone)]
pub struct PointerInput {
    /// Cursor position in physical pixels, `None` when outside the window.
    position: Option<Vec2>,
    clicked: bool,
    left_this_frame: bool,
    held: bool,
    window_size: (u32, u32),
}

impl PointerInput {
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.clicked = false;
        self.left_this_frame = false;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.position = Some(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
                self.held = false;
                self.left_this_frame = true;
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let pressed = *state == ElementState::Pressed;
                if pressed && !self.held {
                    self.clicked = true;
                }
                self.held = pressed;
            }
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            _ => {}
        }
    }

    /// Cursor position in window pixels.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Cursor position in normalized device coordinates, Y up.
    pub fn ndc(&self) -> Option<Vec2> {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return None;
        }
        self.position.map(|p| {
            Vec2::new(
                (p.x / w as f32) * 2.0 - 1.0,
                1.0 - (p.y / h as f32) * 2.0,
            )
        })
    }

    /// Left button went down this frame.
    pub fn clicked(&self) -> bool {
        self.clicked
    }

    /// The cursor left the window this frame.
    pub fn left(&self) -> bool {
        self.left_this_frame
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }
}
