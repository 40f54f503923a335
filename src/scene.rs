//! The whole display: both particle groups, the accent object, the current
//! mode and the slow spin of everything around Y.
//!
//! Layouts are generated once in [`Scene::new`]. After that the scene is driven
//! by two calls: [`Scene::activate`] from the input side and [`Scene::frame`]
//! from the render loop.

use std::sync::Arc;

use glam::Mat4;
use rand::Rng;

use crate::accent::{AccentAnimator, AccentTransform};
use crate::config::{RotationConfig, SceneConfig};
use crate::mode::{DisplayMode, ModeRegister};
use crate::shape::{generate, Category, SceneLayouts};
use crate::text::{rasterize_text_to_points, RasterSettings, TextRasterizer};
use crate::transition::{InstanceRaw, ParticleGroup};

/// Receives the per-frame output of a [`Scene`].
///
/// Implemented by the GPU renderer; tests use an in-memory recorder.
pub trait RenderSink {
    /// Transform applied to every particle and the accent this frame.
    fn set_group_transform(&mut self, transform: Mat4);

    /// A group's full instance buffer. Only called when it changed.
    fn upload_instances(&mut self, category: Category, instances: &[InstanceRaw]);

    /// The accent object's transform this frame.
    fn set_accent(&mut self, accent: &AccentTransform);
}

/// Spin of the whole display around the Y axis.
#[derive(Debug, Clone)]
pub struct GroupRotation {
    config: RotationConfig,
    angle: f32,
}

impl GroupRotation {
    pub fn new(config: RotationConfig) -> Self {
        Self { config, angle: 0.0 }
    }

    /// Radians per second in `mode`.
    pub fn speed(&self, mode: DisplayMode) -> f32 {
        match mode {
            DisplayMode::Text => self.config.text_speed,
            _ => self.config.speed,
        }
    }

    pub fn advance(&mut self, mode: DisplayMode, delta: f32) {
        self.angle += delta * self.speed(mode);
    }

    /// Current angle in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }
}

/// The animated display.
pub struct Scene {
    mode: Arc<ModeRegister>,
    groups: [ParticleGroup; 2],
    accent: AccentAnimator,
    rotation: GroupRotation,
}

impl Scene {
    /// Rasterize the configured text and generate all layouts.
    ///
    /// An empty text pool is not an error: text mode then holds the tree.
    pub fn new<T, R>(config: &SceneConfig, rasterizer: &T, rng: &mut R) -> Self
    where
        T: TextRasterizer + ?Sized,
        R: Rng + ?Sized,
    {
        let settings = RasterSettings::from(&config.text);
        let pool = rasterize_text_to_points(rasterizer, &config.text.content, &settings, rng);
        if pool.is_empty() {
            log::warn!("no text points sampled, text mode will keep the tree shape");
        } else {
            log::info!("sampled {} text points for {:?}", pool.len(), config.text.content);
        }

        let layouts = generate(config, &pool, rng);
        Self::from_layouts(config, layouts)
    }

    /// Build a scene from layouts generated elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if either layout has arrays of different lengths, see
    /// [`ParticleGroupLayout::is_consistent`](crate::shape::ParticleGroupLayout::is_consistent).
    pub fn from_layouts(config: &SceneConfig, layouts: SceneLayouts) -> Self {
        let SceneLayouts { round, angular } = layouts;
        let groups = [
            ParticleGroup::new(Category::Round, Arc::new(round), config.motion.clone()),
            ParticleGroup::new(Category::Angular, Arc::new(angular), config.motion.clone()),
        ];
        log::debug!(
            "scene ready with {} round and {} angular particles",
            groups[0].len(),
            groups[1].len()
        );

        Self {
            mode: Arc::new(ModeRegister::new()),
            groups,
            accent: AccentAnimator::new(config.accent.clone()),
            rotation: GroupRotation::new(config.rotation.clone()),
        }
    }

    /// The current display mode.
    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode.current()
    }

    /// A handle to the mode register for the input side.
    pub fn mode_register(&self) -> Arc<ModeRegister> {
        Arc::clone(&self.mode)
    }

    /// Move to the next arrangement.
    pub fn activate(&self) -> DisplayMode {
        let mode = self.mode.activate();
        log::info!("display mode -> {mode}");
        mode
    }

    /// Both particle groups, round first.
    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    pub fn group(&self, category: Category) -> &ParticleGroup {
        &self.groups[category.index()]
    }

    pub fn accent(&self) -> &AccentTransform {
        self.accent.transform()
    }

    pub fn rotation(&self) -> &GroupRotation {
        &self.rotation
    }

    /// Total particles across both groups.
    pub fn particle_count(&self) -> usize {
        self.groups.iter().map(ParticleGroup::len).sum()
    }

    /// Advance one frame and hand the result to `sink`.
    ///
    /// Without a sink (renderer not attached yet) nothing advances; the next
    /// frame simply tries again. Returns whether the frame ran.
    pub fn frame(&mut self, elapsed: f32, delta: f32, sink: Option<&mut dyn RenderSink>) -> bool {
        let Some(sink) = sink else {
            return false;
        };

        let mode = self.mode.current();
        self.rotation.advance(mode, delta);
        for group in &mut self.groups {
            group.update(mode, elapsed);
        }
        self.accent.update(mode, elapsed);

        sink.set_group_transform(self.rotation.matrix());
        for group in &mut self.groups {
            if group.is_dirty() {
                sink.upload_instances(group.category(), group.instances());
                group.mark_clean();
            }
        }
        sink.set_accent(self.accent.transform());
        true
    }
}
