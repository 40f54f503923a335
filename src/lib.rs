//! # Particle Morph
//!
//! A few thousand metallic particles that glide between three arrangements:
//! a cone-shaped tree, an exploded spherical shell, and a line of text.
//!
//! Every particle owns a target position per arrangement, generated once at
//! startup. Each frame, every particle moves a fixed fraction of the remaining
//! distance towards the target of the current [`DisplayMode`], so switching
//! modes produces a smooth ease-out morph with no explicit timeline.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_morph::prelude::*;
//!
//! let config = SceneConfig::default();
//! particle_morph::run(config)?;
//! ```
//!
//! ## Without a window
//!
//! The animation core is independent of the renderer. Anything that
//! implements [`RenderSink`] can receive the per-frame instance data:
//!
//! ```ignore
//! let rasterizer = default_rasterizer(&config.text);
//! let mut scene = Scene::new(&config, rasterizer.as_ref(), &mut rand::thread_rng());
//!
//! scene.activate(); // Home -> Exploded
//! scene.frame(elapsed, delta, Some(&mut my_sink));
//! ```
//!
//! ## Modules
//!
//! - [`shape`] - target positions and colors for every particle
//! - [`text`] - string to 3D point pool via an off-screen canvas
//! - [`mode`] - the three-state display cycle
//! - [`transition`] - per-frame lerp and instance matrices
//! - [`accent`] - the floating topper above the tree
//! - [`scene`] - ties it together and feeds a [`RenderSink`]

pub mod accent;
pub mod color;
pub mod config;
pub mod error;
pub mod gesture;
mod gpu;
pub mod mode;
pub mod scene;
pub mod shape;
pub mod text;
pub mod time;
pub mod transition;
mod window;

pub use config::SceneConfig;
pub use error::{ColorError, ConfigError, GpuError, TextError, ViewerError};
pub use glam::{Mat4, Quat, Vec3};
pub use mode::{DisplayMode, ModeRegister};
pub use scene::{RenderSink, Scene};
pub use shape::Category;
pub use transition::InstanceRaw;
pub use window::run;

/// Everything needed to build and drive a scene.
///
/// ```ignore
/// use particle_morph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::accent::{AccentAnimator, AccentTransform};
    pub use crate::color::HexColor;
    pub use crate::config::SceneConfig;
    pub use crate::gesture::ClickDetector;
    pub use crate::mode::{DisplayMode, ModeRegister};
    pub use crate::scene::{RenderSink, Scene};
    pub use crate::shape::{Category, ParticleGroupLayout, SceneLayouts};
    pub use crate::text::{default_rasterizer, NullRasterizer, TextRasterizer};
    pub use crate::time::SceneClock;
    pub use crate::transition::{InstanceRaw, ParticleGroup};
    pub use crate::{Mat4, Quat, Vec3};
}
