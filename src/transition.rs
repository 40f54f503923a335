//! Per-frame particle transitions.
//!
//! Each [`ParticleGroup`] keeps the live position of every particle and eases
//! it toward the target array of the current [`DisplayMode`]:
//!
//! ```text
//! current = current + lerp_factor * (target - current)
//! ```
//!
//! That is an exponential approach: after `k` frames the remaining distance is
//! `(1 - lerp_factor)^k` of where it started, so particles glide in and never
//! overshoot. On top of the position each particle spins and pulses, with its
//! index used as a phase offset so neighbours do not move in lock-step.
//!
//! The composed transforms go straight into a reused, GPU-ready
//! [`InstanceRaw`] buffer. Nothing is allocated per frame.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::MotionConfig;
use crate::mode::DisplayMode;
use crate::shape::{Category, ParticleGroupLayout};

/// One instance as uploaded to the GPU.
///
/// `color.xyz` is linear RGB and `color.w` the emissive strength.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    /// An instance with the given transform and color.
    pub fn new(model: Mat4, color: Vec3, emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(emissive).to_array(),
        }
    }

    /// The transform as a matrix.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// Self-rotation of particle `index` at `elapsed` seconds.
#[inline]
pub fn spin(motion: &MotionConfig, elapsed: f32, index: usize) -> Quat {
    let phase = index as f32;
    let rates = motion.spin_rates;
    Quat::from_euler(
        EulerRot::XYZ,
        rates.x * elapsed + phase,
        rates.y * elapsed + phase,
        rates.z * elapsed + phase,
    )
}

/// Uniform pulsing scale of particle `index` at `elapsed` seconds.
#[inline]
pub fn pulse_scale(motion: &MotionConfig, elapsed: f32, index: usize) -> f32 {
    let phase = index as f32;
    motion.base_scale * (1.0 + motion.pulse_amplitude * (motion.pulse_frequency * elapsed + phase).sin())
}

/// Live state of one category of particles.
pub struct ParticleGroup {
    category: Category,
    layout: Arc<ParticleGroupLayout>,
    motion: MotionConfig,
    current: Vec<Vec3>,
    instances: Vec<InstanceRaw>,
    dirty: bool,
}

impl ParticleGroup {
    /// Start every particle at its home position.
    ///
    /// Colors are written into the instance buffer here, once.
    ///
    /// # Panics
    ///
    /// Panics if the layout arrays differ in length.
    pub fn new(category: Category, layout: Arc<ParticleGroupLayout>, motion: MotionConfig) -> Self {
        assert!(
            layout.is_consistent(),
            "{category:?} layout arrays differ in length: home {}, exploded {}, text {}, color {}",
            layout.home.len(),
            layout.exploded.len(),
            layout.text_target.len(),
            layout.color.len()
        );
        let current = layout.home.clone();
        let instances = layout
            .home
            .iter()
            .zip(&layout.color)
            .enumerate()
            .map(|(i, (position, color))| {
                let scale = Vec3::splat(pulse_scale(&motion, 0.0, i));
                let model = Mat4::from_scale_rotation_translation(scale, spin(&motion, 0.0, i), *position);
                InstanceRaw::new(model, *color, 0.0)
            })
            .collect();

        Self {
            category,
            layout,
            motion,
            current,
            instances,
            dirty: true,
        }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The layout this group animates between.
    pub fn layout(&self) -> &ParticleGroupLayout {
        &self.layout
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.current.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Live interpolated positions.
    pub fn current(&self) -> &[Vec3] {
        &self.current
    }

    /// Per-instance transforms and colors.
    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    /// Whether the instance buffer changed since the last upload.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the instance buffer as uploaded.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Advance one frame toward the targets of `mode`.
    pub fn update(&mut self, mode: DisplayMode, elapsed: f32) {
        let targets = self.layout.targets(mode);
        let alpha = self.motion.lerp_factor;

        for (i, ((current, target), instance)) in self
            .current
            .iter_mut()
            .zip(targets)
            .zip(self.instances.iter_mut())
            .enumerate()
        {
            *current = current.lerp(*target, alpha);

            let scale = Vec3::splat(pulse_scale(&self.motion, elapsed, i));
            let rotation = spin(&self.motion, elapsed, i);
            instance.model =
                Mat4::from_scale_rotation_translation(scale, rotation, *current).to_cols_array_2d();
        }

        // Once per frame, not per particle
        self.dirty = true;
    }
}
