//! Orbit camera for viewing the display.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Radians of orbit per pixel of drag at `rotate_speed == 1.0`.
const RADIANS_PER_PIXEL: f32 = 0.01;

/// Orbit camera around the origin. Rotates and zooms, never pans.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    fov_y: f32,
    min_distance: f32,
    max_distance: f32,
    rotate_speed: f32,
}

impl Camera {
    /// Looking at the origin from `config.distance` along +Z.
    ///
    /// Swapped zoom limits are put back in order instead of panicking.
    pub fn new(config: &CameraConfig) -> Self {
        let min_distance = config.min_distance.min(config.max_distance);
        let max_distance = config.max_distance.max(config.min_distance);
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.distance.max(min_distance).min(max_distance),
            target: Vec3::ZERO,
            fov_y: config.fov_degrees.to_radians(),
            min_distance,
            max_distance,
            rotate_speed: config.rotate_speed,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Rotate by a pointer drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let step = RADIANS_PER_PIXEL * self.rotate_speed;
        self.yaw -= dx * step;
        self.pitch = (self.pitch + dy * step).clamp(-1.5, 1.5);
    }

    /// Move closer (positive `amount`) or further away, within the limits.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).max(self.min_distance).min(self.max_distance);
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Projection times view.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect, 0.1, 500.0);
        proj * self.view_matrix()
    }
}
