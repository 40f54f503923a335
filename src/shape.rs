//! Procedural particle layouts.
//!
//! Every particle gets three independent target positions, one per
//! [`DisplayMode`], plus a fixed color:
//!
//! - **Home**: inside a cone ("tree"). Height is uniform, the disk radius tapers
//!   linearly toward the top, and the `sqrt` on the radial draw keeps the
//!   density uniform across each disk instead of clustering on the axis.
//! - **Exploded**: inside a thick sphere shell. Directions use the inverse-CDF
//!   construction `phi = acos(2v - 1)` so points do not bunch up at the poles.
//! - **Text**: drawn with replacement from the rasterized text pool, or the
//!   particle's own home position when the pool is empty.
//!
//! Generation is randomized on purpose. Pass `rand::thread_rng()` for a
//! different layout every run, or a seeded RNG for reproducible tests.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::color::shift_lightness;
use crate::config::{CategoryPalette, ExplosionConfig, PaletteConfig, SceneConfig, TreeConfig};
use crate::mode::DisplayMode;

/// Visual grouping of particles. Each category is drawn with its own mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Drawn as spheres.
    Round,
    /// Drawn as cubes.
    Angular,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Round, Category::Angular];

    /// This category's palette.
    pub fn palette<'a>(&self, palettes: &'a PaletteConfig) -> &'a CategoryPalette {
        match self {
            Category::Round => &palettes.round,
            Category::Angular => &palettes.angular,
        }
    }

    /// Position of this category in [`Category::ALL`].
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Category::Round => 0,
            Category::Angular => 1,
        }
    }
}

/// Target positions and colors for one particle group.
///
/// All four vectors have the same length and index `i` is the same particle
/// in each of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleGroupLayout {
    pub home: Vec<Vec3>,
    pub exploded: Vec<Vec3>,
    pub text_target: Vec<Vec3>,
    /// Linear RGB.
    pub color: Vec<Vec3>,
}

impl ParticleGroupLayout {
    fn with_capacity(count: usize) -> Self {
        Self {
            home: Vec::with_capacity(count),
            exploded: Vec::with_capacity(count),
            text_target: Vec::with_capacity(count),
            color: Vec::with_capacity(count),
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.home.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
    }

    /// Whether all four arrays hold one entry per particle.
    pub fn is_consistent(&self) -> bool {
        let n = self.home.len();
        self.exploded.len() == n && self.text_target.len() == n && self.color.len() == n
    }

    /// The target array for `mode`.
    #[inline]
    pub fn targets(&self, mode: DisplayMode) -> &[Vec3] {
        match mode {
            DisplayMode::Home => &self.home,
            DisplayMode::Exploded => &self.exploded,
            DisplayMode::Text => &self.text_target,
        }
    }
}

/// Layouts for both categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLayouts {
    pub round: ParticleGroupLayout,
    pub angular: ParticleGroupLayout,
}

impl SceneLayouts {
    /// The layout of `category`.
    pub fn get(&self, category: Category) -> &ParticleGroupLayout {
        match category {
            Category::Round => &self.round,
            Category::Angular => &self.angular,
        }
    }

    /// Particles across both categories.
    pub fn total_len(&self) -> usize {
        self.round.len() + self.angular.len()
    }
}

/// Split `total` particles into `(round, angular)` counts.
///
/// The round share is rounded down so the two always add up to `total`.
pub fn split_count(total: u32, round_fraction: f32) -> (usize, usize) {
    let round = ((total as f32 * round_fraction.clamp(0.0, 1.0)).floor() as usize).min(total as usize);
    (round, total as usize - round)
}

/// Random sampling helpers for particle targets.
///
/// Borrows the caller's RNG so a single seeded source can drive a whole scene.
pub struct ShapeSampler<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> ShapeSampler<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng }
    }

    /// Random point inside the tree cone.
    pub fn tree_position(&mut self, tree: &TreeConfig) -> Vec3 {
        let theta = self.rng.gen::<f32>() * TAU;
        let h = tree.half_height;
        let y = -h + self.rng.gen::<f32>() * 2.0 * h;

        // Linear taper from the base radius at -h to the top radius at +h
        let taper = tree.base_radius + (y + h) * (tree.top_radius - tree.base_radius) / (2.0 * h);
        // sqrt for uniform disk
        let radius = taper * self.rng.gen::<f32>().sqrt();

        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    }

    /// Random point inside the explosion shell.
    pub fn shell_position(&mut self, explosion: &ExplosionConfig) -> Vec3 {
        let u = self.rng.gen::<f32>();
        let v = self.rng.gen::<f32>();
        let theta = TAU * u;
        let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
        let r = explosion.min_radius
            + self.rng.gen::<f32>() * (explosion.max_radius - explosion.min_radius);

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Random point from `pool`, or `fallback` when the pool is empty.
    pub fn text_position(&mut self, pool: &[Vec3], fallback: Vec3) -> Vec3 {
        if pool.is_empty() {
            return fallback;
        }
        pool[self.rng.gen_range(0..pool.len())]
    }

    /// One of the palette's two colors with a small random lightness shift.
    pub fn particle_color(&mut self, palette: &CategoryPalette, lightness_jitter: f32) -> Vec3 {
        let base = if self.rng.gen::<f32>() > palette.primary_threshold {
            palette.primary
        } else {
            palette.secondary
        };
        let delta = (self.rng.gen::<f32>() * 2.0 - 1.0) * lightness_jitter;
        shift_lightness(base.linear(), delta)
    }
}

/// Build the layout for `count` particles of one category.
pub fn build_layout<R: Rng + ?Sized>(
    count: usize,
    category: Category,
    config: &SceneConfig,
    text_pool: &[Vec3],
    rng: &mut R,
) -> ParticleGroupLayout {
    let palette = category.palette(&config.palettes);
    let mut sampler = ShapeSampler::new(rng);
    let mut layout = ParticleGroupLayout::with_capacity(count);

    for _ in 0..count {
        let home = sampler.tree_position(&config.tree);
        layout.home.push(home);
        layout.text_target.push(sampler.text_position(text_pool, home));
        layout.exploded.push(sampler.shell_position(&config.explosion));
        layout
            .color
            .push(sampler.particle_color(palette, config.palettes.lightness_jitter));
    }

    layout
}

/// Build layouts for both categories from one shared text pool.
pub fn generate<R: Rng + ?Sized>(config: &SceneConfig, text_pool: &[Vec3], rng: &mut R) -> SceneLayouts {
    let (round, angular) = split_count(config.particles.total_count, config.particles.round_fraction);
    log::debug!(
        "generating {round} round and {angular} angular particles from {} text points",
        text_pool.len()
    );

    SceneLayouts {
        round: build_layout(round, Category::Round, config, text_pool, rng),
        angular: build_layout(angular, Category::Angular, config, text_pool, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_split_count() {
        assert_eq!(split_count(4000, 0.6), (2400, 1600));
        assert_eq!(split_count(5, 0.6), (3, 2));
        assert_eq!(split_count(0, 0.6), (0, 0));
        assert_eq!(split_count(7, 1.0), (7, 0));
        assert_eq!(split_count(7, 0.0), (0, 7));
    }

    #[test]
    fn test_tree_positions_stay_in_cone() {
        let tree = TreeConfig::default();
        let mut rng = rng();
        let mut sampler = ShapeSampler::new(&mut rng);
        for _ in 0..2000 {
            let p = sampler.tree_position(&tree);
            assert!(p.y.abs() <= tree.half_height);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            let t = (p.y + tree.half_height) / (2.0 * tree.half_height);
            let max_radius = tree.base_radius + t * (tree.top_radius - tree.base_radius);
            assert!(radius <= max_radius + 1e-4, "radius {radius} > {max_radius} at y {}", p.y);
        }
    }

    #[test]
    fn test_shell_positions_stay_in_shell() {
        let explosion = ExplosionConfig::default();
        let mut rng = rng();
        let mut sampler = ShapeSampler::new(&mut rng);
        for _ in 0..2000 {
            let r = sampler.shell_position(&explosion).length();
            assert!(r >= explosion.min_radius - 1e-3 && r <= explosion.max_radius + 1e-3);
        }
    }

    #[test]
    fn test_shell_is_not_pole_heavy() {
        // Uniform on the sphere: about 13.4% of directions fall within 30 degrees
        // of the two poles combined. Naive (theta, phi) sampling gives ~33%.
        let explosion = ExplosionConfig::default();
        let mut rng = rng();
        let mut sampler = ShapeSampler::new(&mut rng);
        let samples = 20_000;
        let near_poles = (0..samples)
            .map(|_| sampler.shell_position(&explosion).normalize())
            .filter(|d| d.z.abs() > 30f32.to_radians().cos())
            .count();
        let share = near_poles as f32 / samples as f32;
        assert!(share < 0.18, "pole share {share}");
    }

    #[test]
    fn test_text_position_falls_back_on_empty_pool() {
        let mut rng = rng();
        let mut sampler = ShapeSampler::new(&mut rng);
        let fallback = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(sampler.text_position(&[], fallback), fallback);

        let pool = [Vec3::X, Vec3::Y];
        for _ in 0..50 {
            let p = sampler.text_position(&pool, fallback);
            assert!(pool.contains(&p));
        }
    }

    #[test]
    fn test_colors_come_from_palette_family() {
        use crate::color::rgb_to_hsl;

        let palettes = PaletteConfig::default();
        let jitter = palettes.lightness_jitter;
        let mut rng = rng();
        let mut sampler = ShapeSampler::new(&mut rng);
        let gold = rgb_to_hsl(palettes.round.primary.linear());
        let red = rgb_to_hsl(palettes.round.secondary.linear());
        let (mut saw_gold, mut saw_red) = (0, 0);
        for _ in 0..2000 {
            let hsl = rgb_to_hsl(sampler.particle_color(&palettes.round, jitter));
            let base = if (hsl.h - gold.h).abs() < 2e-3 {
                saw_gold += 1;
                gold
            } else {
                assert!((hsl.h - red.h).abs() < 2e-3, "hue {} left both families", hsl.h);
                saw_red += 1;
                red
            };
            assert!((hsl.s - base.s).abs() < 2e-3);
            assert!((hsl.l - base.l).abs() <= jitter + 1e-4, "lightness {} vs {}", hsl.l, base.l);
        }
        // primary_threshold 0.4 puts roughly 60% on the primary color
        assert!(saw_gold > 1000 && saw_red > 600, "{saw_gold} gold, {saw_red} red");
    }

    #[test]
    fn test_layout_consistency() {
        let config = SceneConfig::default();
        let mut layout = build_layout(8, Category::Round, &config, &[], &mut rng());
        assert!(layout.is_consistent());
        layout.text_target.truncate(7);
        assert!(!layout.is_consistent());
        assert!(ParticleGroupLayout::default().is_consistent());
    }

    #[test]
    fn test_build_layout_lengths_match() {
        let config = SceneConfig::default();
        let mut rng = rng();
        let layout = build_layout(123, Category::Angular, &config, &[Vec3::ZERO], &mut rng);
        assert_eq!(layout.len(), 123);
        assert_eq!(layout.exploded.len(), 123);
        assert_eq!(layout.text_target.len(), 123);
        assert_eq!(layout.color.len(), 123);
        assert!(layout.text_target.iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn test_generate_zero_particles() {
        let mut config = SceneConfig::default();
        config.particles.total_count = 0;
        let layouts = generate(&config, &[], &mut rng());
        assert!(layouts.round.is_empty());
        assert!(layouts.angular.is_empty());
        assert_eq!(layouts.total_len(), 0);
    }

    #[test]
    fn test_layout_targets_select_by_mode() {
        let config = SceneConfig::default();
        let layout = build_layout(4, Category::Round, &config, &[], &mut rng());
        assert_eq!(layout.targets(DisplayMode::Home), layout.home.as_slice());
        assert_eq!(layout.targets(DisplayMode::Exploded), layout.exploded.as_slice());
        assert_eq!(layout.targets(DisplayMode::Text), layout.text_target.as_slice());
    }
}
