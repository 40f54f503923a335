//! The topper above the tree.
//!
//! It spins continuously, bobs while the tree is shown, and eases its scale to
//! 1 in [`DisplayMode::Home`] and to 0 in every other mode, using the same
//! exponential approach as the particles.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::AccentConfig;
use crate::mode::DisplayMode;

/// Transform of the accent object for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccentTransform {
    pub scale: f32,
    pub position_y: f32,
    pub rotation_y: f32,
    pub rotation_z: f32,
}

impl AccentTransform {
    /// Compose into a model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, 0.0, self.rotation_y, self.rotation_z),
            Vec3::new(0.0, self.position_y, 0.0),
        )
    }

    /// World position of the accent's point light under the display's `group` transform.
    ///
    /// The light sits at the accent's origin, so it follows the bobbing and the
    /// display spin but not the accent's own scale or rotation.
    pub fn light_position(&self, group: Mat4) -> Vec3 {
        group.transform_point3(Vec3::new(0.0, self.position_y, 0.0))
    }
}

/// Drives the accent object's transform from the current mode.
#[derive(Debug, Clone)]
pub struct AccentAnimator {
    config: AccentConfig,
    transform: AccentTransform,
}

impl AccentAnimator {
    /// Fully grown, resting at its base height.
    pub fn new(config: AccentConfig) -> Self {
        let transform = AccentTransform {
            scale: 1.0,
            position_y: config.base_height,
            rotation_y: 0.0,
            rotation_z: 0.0,
        };
        Self { config, transform }
    }

    pub fn config(&self) -> &AccentConfig {
        &self.config
    }

    pub fn transform(&self) -> &AccentTransform {
        &self.transform
    }

    /// Scale the accent is heading for in `mode`.
    #[inline]
    pub fn target_scale(mode: DisplayMode) -> f32 {
        if mode == DisplayMode::Home {
            1.0
        } else {
            0.0
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, mode: DisplayMode, elapsed: f32) {
        let c = &self.config;
        let t = &mut self.transform;

        t.rotation_y = elapsed;
        t.rotation_z = c.wobble_amplitude * (c.wobble_frequency * elapsed).sin();

        let target = Self::target_scale(mode);
        t.scale += (target - t.scale) * c.lerp_factor;

        // Outside Home the position is left where it was while the scale shrinks
        if mode == DisplayMode::Home {
            t.position_y = c.base_height + c.float_amplitude * (c.float_frequency * elapsed).sin();
        }
    }
}
