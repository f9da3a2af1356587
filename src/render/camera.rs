//! Orbit camera for the scene view.

use glam::{Mat4, Vec3};

/// Vertical field of view, degrees.
pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Orbit camera that slowly circles the galaxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Yaw change per second, radians. Zero disables auto-rotation.
    pub auto_rotate_speed: f32,
}

impl OrbitCamera {
    /// Camera framing the galaxy from slightly above.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.25,
            distance: 12.0,
            target: Vec3::new(0.0, -1.0, 0.0),
            auto_rotate_speed: 0.2,
        }
    }

    /// Camera sitting just past the starfield's far plane, looking down -Z
    /// into the tunnel.
    pub fn starfield(far: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: far + 1.0,
            target: Vec3::ZERO,
            auto_rotate_speed: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.yaw = (self.yaw + self.auto_rotate_speed * dt) % std::f32::consts::TAU;
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(FOV_DEGREES.to_radians(), aspect, NEAR_PLANE, FAR_PLANE);
        proj * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
