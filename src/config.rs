//! Scene configuration.
//!
//! Every tunable of the display lives here: particle counts, shape bounds, the
//! text to rasterize, palettes, motion constants and viewer input thresholds.
//! Defaults reproduce the stock scene; a JSON file can override any subset of
//! fields.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::ConfigError;

/// Complete scene configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub particles: ParticleConfig,
    pub tree: TreeConfig,
    pub explosion: ExplosionConfig,
    pub text: TextConfig,
    pub palettes: PaletteConfig,
    pub motion: MotionConfig,
    pub accent: AccentConfig,
    pub rotation: RotationConfig,
    pub gesture: GestureConfig,
    pub camera: CameraConfig,
}

/// How many particles exist and how they split between the two categories.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub total_count: u32,
    /// Share of `total_count` that goes to the round (sphere) group; the rest
    /// are angular (cubes).
    pub round_fraction: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            total_count: 4000,
            round_fraction: 0.6,
        }
    }
}

/// Cone ("tree") shape bounds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    /// The cone spans `-half_height..half_height` on Y.
    pub half_height: f32,
    /// Disk radius at the bottom of the cone.
    pub base_radius: f32,
    /// Disk radius at the top of the cone.
    pub top_radius: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            half_height: 10.0,
            base_radius: 8.0,
            top_radius: 0.5,
        }
    }
}

/// Sphere shell used by the exploded arrangement.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplosionConfig {
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            min_radius: 20.0,
            max_radius: 35.0,
        }
    }
}

/// Text rasterization settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    pub content: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub font_size_px: f32,
    /// Grid stride used when scanning the canvas for opaque pixels.
    pub sample_step_px: u32,
    /// World units per canvas pixel.
    pub world_scale: f32,
    /// Points get a random depth in `-depth_jitter..depth_jitter`.
    pub depth_jitter: f32,
    /// A sampled pixel is part of the text when its alpha is above this.
    pub alpha_threshold: u8,
    /// Bold serif font to rasterize with. When unset, well-known system
    /// locations are searched.
    pub font_path: Option<PathBuf>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "MERRY CHRISTMAS 2025".into(),
            canvas_width: 2000,
            canvas_height: 300,
            font_size_px: 200.0,
            sample_step_px: 8,
            world_scale: 0.035,
            depth_jitter: 1.0,
            alpha_threshold: 128,
            font_path: None,
        }
    }
}

/// Two-color palette of one particle category.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryPalette {
    pub primary: HexColor,
    pub secondary: HexColor,
    /// A uniform draw above this picks `primary`, otherwise `secondary`.
    pub primary_threshold: f32,
}

/// Palettes for both categories plus the per-particle lightness variance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub round: CategoryPalette,
    pub angular: CategoryPalette,
    /// Lightness is shifted by a uniform draw in `-lightness_jitter..lightness_jitter`.
    pub lightness_jitter: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            // Gold and red
            round: CategoryPalette {
                primary: HexColor::new(0xFF, 0xD7, 0x00),
                secondary: HexColor::new(0xC4, 0x1E, 0x3A),
                primary_threshold: 0.4,
            },
            // Metallic gold and dark green
            angular: CategoryPalette {
                primary: HexColor::new(0xDA, 0xA5, 0x20),
                secondary: HexColor::new(0x00, 0x64, 0x00),
                primary_threshold: 0.6,
            },
            lightness_jitter: 0.05,
        }
    }
}

/// Per-frame particle motion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of the remaining distance covered each frame.
    pub lerp_factor: f32,
    pub base_scale: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    /// Self-rotation rate per axis, radians per second.
    pub spin_rates: Vec3,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.05,
            base_scale: 0.25,
            pulse_amplitude: 0.1,
            pulse_frequency: 3.0,
            spin_rates: Vec3::new(0.5, 0.3, 0.4),
        }
    }
}

/// The topper above the tree.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccentConfig {
    pub base_height: f32,
    pub float_amplitude: f32,
    pub float_frequency: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub lerp_factor: f32,
    pub radius: f32,
    pub color: HexColor,
    pub emissive: f32,
    /// Strength of the point light the accent carries.
    pub light_intensity: f32,
    /// Distance at which that light has faded to nothing.
    pub light_range: f32,
}

impl Default for AccentConfig {
    fn default() -> Self {
        Self {
            base_height: 10.5,
            float_amplitude: 0.2,
            float_frequency: 2.0,
            wobble_amplitude: 0.1,
            wobble_frequency: 2.0,
            lerp_factor: 0.05,
            radius: 1.2,
            color: HexColor::new(0xFF, 0xFF, 0x00),
            emissive: 0.5,
            light_intensity: 2.0,
            light_range: 10.0,
        }
    }
}

/// Slow spin of the whole display around Y, radians per second.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RotationConfig {
    pub speed: f32,
    /// Slower spin while the text is shown so it stays readable.
    pub text_speed: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            speed: 0.2,
            text_speed: 0.05,
        }
    }
}

/// Click-vs-drag thresholds.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub max_distance_px: f32,
    pub max_duration_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_distance_px: 10.0,
            max_duration_ms: 300,
        }
    }
}

/// Orbit camera.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 35.0,
            fov_degrees: 50.0,
            min_distance: 10.0,
            max_distance: 60.0,
            rotate_speed: 0.5,
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the generator or the animation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.particles.round_fraction) {
            return Err(ConfigError::invalid(
                "particles.round_fraction",
                "must be within 0.0..=1.0",
            ));
        }
        if !(self.tree.half_height > 0.0) {
            return Err(ConfigError::invalid("tree.half_height", "must be positive"));
        }
        if self.tree.base_radius < 0.0 || self.tree.top_radius < 0.0 {
            return Err(ConfigError::invalid("tree", "radii must not be negative"));
        }
        if self.explosion.min_radius < 0.0 || self.explosion.min_radius > self.explosion.max_radius {
            return Err(ConfigError::invalid(
                "explosion",
                format!(
                    "need 0 <= min_radius <= max_radius, got {}..{}",
                    self.explosion.min_radius, self.explosion.max_radius
                ),
            ));
        }
        if self.text.canvas_width == 0 || self.text.canvas_height == 0 {
            return Err(ConfigError::invalid("text", "canvas dimensions must be non-zero"));
        }
        if self.text.sample_step_px == 0 {
            return Err(ConfigError::invalid("text.sample_step_px", "must be at least 1"));
        }
        if !(self.text.font_size_px > 0.0) {
            return Err(ConfigError::invalid("text.font_size_px", "must be positive"));
        }
        if self.text.depth_jitter < 0.0 {
            return Err(ConfigError::invalid("text.depth_jitter", "must not be negative"));
        }
        if self.palettes.lightness_jitter < 0.0 {
            return Err(ConfigError::invalid(
                "palettes.lightness_jitter",
                "must not be negative",
            ));
        }
        for (field, factor) in [
            ("motion.lerp_factor", self.motion.lerp_factor),
            ("accent.lerp_factor", self.accent.lerp_factor),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::invalid(field, "must be within 0.0 (exclusive) ..= 1.0"));
            }
        }
        if self.accent.light_range < 0.0 {
            return Err(ConfigError::invalid("accent.light_range", "must not be negative"));
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::invalid(
                "camera",
                "min_distance must not exceed max_distance",
            ));
        }
        Ok(())
    }
}
