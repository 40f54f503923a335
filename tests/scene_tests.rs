//! Integration tests for the animation core.
//!
//! These drive the public API the same way the viewer does: build a scene,
//! feed it activations and frames, and look at what reaches the render sink.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec2, Vec3};
use image::{GrayAlphaImage, LumaA};
use particle_morph::accent::{AccentAnimator, AccentTransform};
use particle_morph::config::{MotionConfig, SceneConfig};
use particle_morph::gesture::ClickDetector;
use particle_morph::mode::{DisplayMode, ModeRegister};
use particle_morph::scene::{RenderSink, Scene};
use particle_morph::shape::{generate, Category, ParticleGroupLayout};
use particle_morph::text::{NullRasterizer, RasterSettings, TextRasterizer};
use particle_morph::transition::{InstanceRaw, ParticleGroup};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Helpers
// ============================================================================

/// Paints an 80x80 opaque square in the top-left corner of the canvas.
struct CornerBlock;

impl TextRasterizer for CornerBlock {
    fn render(&self, _text: &str, settings: &RasterSettings) -> Option<GrayAlphaImage> {
        let mut canvas = GrayAlphaImage::new(settings.canvas_width, settings.canvas_height);
        for y in 0..80 {
            for x in 0..80 {
                canvas.put_pixel(x, y, LumaA([255, 255]));
            }
        }
        Some(canvas)
    }
}

#[derive(Default)]
struct NullSink {
    frames: usize,
}

impl RenderSink for NullSink {
    fn set_group_transform(&mut self, _transform: Mat4) {
        self.frames += 1;
    }

    fn upload_instances(&mut self, _category: Category, _instances: &[InstanceRaw]) {}

    fn set_accent(&mut self, _accent: &AccentTransform) {}
}

fn config_with(total: u32) -> SceneConfig {
    let mut config = SceneConfig::default();
    config.particles.total_count = total;
    config
}

// ============================================================================
// Shape generation
// ============================================================================

#[test]
fn test_layout_arrays_match_group_count() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    let layouts = generate(&config, &[], &mut rng);

    assert_eq!(layouts.round.len(), 2400);
    assert_eq!(layouts.angular.len(), 1600);
    for category in Category::ALL {
        let layout = layouts.get(category);
        let n = layout.len();
        assert_eq!(layout.home.len(), n);
        assert_eq!(layout.exploded.len(), n);
        assert_eq!(layout.text_target.len(), n);
        assert_eq!(layout.color.len(), n);
    }
    assert_eq!(layouts.total_len(), 4000);
}

#[test]
fn test_tree_positions_stay_inside_cone() {
    let config = SceneConfig::default();
    let tree = &config.tree;
    let mut rng = StdRng::seed_from_u64(2);
    let layouts = generate(&config, &[], &mut rng);

    for p in layouts.round.home.iter().chain(&layouts.angular.home) {
        assert!(p.y.abs() <= tree.half_height + 1e-4, "y out of range: {p}");
        let t = (p.y + tree.half_height) / (2.0 * tree.half_height);
        let max_radius = tree.base_radius + t * (tree.top_radius - tree.base_radius);
        assert!(max_radius >= 0.0);
        assert!(Vec2::new(p.x, p.z).length() <= max_radius + 1e-4);
    }
}

#[test]
fn test_exploded_positions_lie_in_shell() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let layouts = generate(&config, &[], &mut rng);

    for p in layouts.round.exploded.iter().chain(&layouts.angular.exploded) {
        let r = p.length();
        assert!(r >= 20.0 - 1e-3 && r <= 35.0 + 1e-3, "radius {r}");
    }
}

#[test]
fn test_text_targets_fall_back_to_home() {
    let scene = Scene::new(&config_with(300), &NullRasterizer, &mut StdRng::seed_from_u64(4));
    for group in scene.groups() {
        let layout = group.layout();
        assert_eq!(layout.text_target, layout.home);
    }
}

#[test]
fn test_text_targets_come_from_canvas() {
    let config = config_with(300);
    let scene = Scene::new(&config, &CornerBlock, &mut StdRng::seed_from_u64(5));

    // Default canvas is 2000x300 at 0.035 world units per pixel
    let scale = config.text.world_scale;
    let (min_x, max_x) = (-1000.0 * scale, (80.0 - 1000.0) * scale);
    let (min_y, max_y) = ((150.0 - 80.0) * scale, 150.0 * scale);
    for group in scene.groups() {
        for p in &group.layout().text_target {
            assert!(p.x >= min_x - 1e-4 && p.x <= max_x + 1e-4, "x {}", p.x);
            assert!(p.y >= min_y - 1e-4 && p.y <= max_y + 1e-4, "y {}", p.y);
            assert!(p.z.abs() <= config.text.depth_jitter);
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_lerp_distance_decays_geometrically() {
    let home = vec![Vec3::new(0.0, -5.0, 2.0), Vec3::new(3.0, 1.0, -4.0)];
    let exploded = vec![Vec3::new(20.0, 10.0, -7.0), Vec3::new(-25.0, 0.0, 12.0)];
    let layout = Arc::new(ParticleGroupLayout {
        text_target: home.clone(),
        color: vec![Vec3::ONE; 2],
        home: home.clone(),
        exploded: exploded.clone(),
    });
    let motion = MotionConfig::default();
    let alpha = motion.lerp_factor;
    let mut group = ParticleGroup::new(Category::Round, layout, motion);

    let initial: Vec<f32> = home.iter().zip(&exploded).map(|(h, e)| h.distance(*e)).collect();
    let mut previous = group.current().to_vec();

    for k in 1..=60 {
        group.update(DisplayMode::Exploded, k as f32 / 60.0);
        let expected_factor = (1.0 - alpha).powi(k);
        for (i, (current, target)) in group.current().iter().zip(&exploded).enumerate() {
            let expected = initial[i] * expected_factor;
            let actual = current.distance(*target);
            assert!(
                (actual - expected).abs() <= 1e-3 * initial[i],
                "step {k}, particle {i}: {actual} vs {expected}"
            );

            // Every component closes in without crossing the target
            for axis in 0..3 {
                let before = (target[axis] - previous[i][axis]).abs();
                let after = (target[axis] - current[axis]).abs();
                assert!(after <= before + 1e-5);
                assert!((target[axis] - current[axis]) * (target[axis] - previous[i][axis]) >= 0.0);
            }
        }
        previous = group.current().to_vec();
    }
}

#[test]
fn test_colors_never_change_after_generation() {
    let mut scene = Scene::new(&config_with(200), &NullRasterizer, &mut StdRng::seed_from_u64(6));
    let initial: Vec<Vec<[u32; 4]>> = scene
        .groups()
        .iter()
        .map(|g| g.instances().iter().map(|i| i.color.map(f32::to_bits)).collect())
        .collect();
    let layout_colors: Vec<Vec<Vec3>> = scene.groups().iter().map(|g| g.layout().color.clone()).collect();

    let mut sink = NullSink::default();
    for frame in 0..300 {
        if frame % 100 == 0 {
            scene.activate();
        }
        scene.frame(frame as f32 / 60.0, 1.0 / 60.0, Some(&mut sink));
    }
    assert_eq!(sink.frames, 300);

    for (group, (colors, layout)) in scene.groups().iter().zip(initial.iter().zip(&layout_colors)) {
        let now: Vec<[u32; 4]> = group.instances().iter().map(|i| i.color.map(f32::to_bits)).collect();
        assert_eq!(&now, colors);
        assert_eq!(&group.layout().color, layout);
    }
}

#[test]
fn test_particles_reach_text_arrangement() {
    let mut scene = Scene::new(&config_with(100), &CornerBlock, &mut StdRng::seed_from_u64(7));
    scene.activate();
    scene.activate();
    assert_eq!(scene.mode(), DisplayMode::Text);

    let mut sink = NullSink::default();
    for frame in 0..600 {
        scene.frame(frame as f32 / 60.0, 1.0 / 60.0, Some(&mut sink));
    }
    for group in scene.groups() {
        for (current, target) in group.current().iter().zip(&group.layout().text_target) {
            assert!(current.distance(*target) < 1e-3);
        }
    }
}

// ============================================================================
// Mode cycle and gestures
// ============================================================================

#[test]
fn test_three_activations_return_home() {
    let register = ModeRegister::new();
    let seen: Vec<DisplayMode> = (0..3).map(|_| register.activate()).collect();
    assert_eq!(seen, vec![DisplayMode::Exploded, DisplayMode::Text, DisplayMode::Home]);
    assert_eq!(register.current(), DisplayMode::Home);
}

#[test]
fn test_click_activates_once_and_drag_does_not() {
    let config = config_with(10);
    let scene = Scene::new(&config, &NullRasterizer, &mut StdRng::seed_from_u64(8));
    let mut clicks = ClickDetector::new(&config.gesture);
    let t0 = Instant::now();

    clicks.press(Vec2::new(400.0, 300.0), t0);
    if clicks.release(Vec2::new(404.0, 303.0), t0 + Duration::from_millis(150)) {
        scene.activate();
    }
    // A stray second release must not count again
    if clicks.release(Vec2::new(404.0, 303.0), t0 + Duration::from_millis(160)) {
        scene.activate();
    }
    assert_eq!(scene.mode(), DisplayMode::Exploded);

    clicks.press(Vec2::new(400.0, 300.0), t0);
    if clicks.release(Vec2::new(460.0, 300.0), t0 + Duration::from_millis(100)) {
        scene.activate();
    }
    clicks.press(Vec2::new(400.0, 300.0), t0);
    if clicks.release(Vec2::new(400.0, 300.0), t0 + Duration::from_millis(900)) {
        scene.activate();
    }
    assert_eq!(scene.mode(), DisplayMode::Exploded);
}

// ============================================================================
// Accent object
// ============================================================================

#[test]
fn test_accent_regrows_in_home_without_overshoot() {
    let config = SceneConfig::default();
    let mut accent = AccentAnimator::new(config.accent.clone());

    for frame in 0..200 {
        accent.update(DisplayMode::Text, frame as f32 / 60.0);
    }
    let shrunk = accent.transform().scale;
    assert!(shrunk < 0.01);

    let mut last = shrunk;
    for frame in 200..800 {
        accent.update(DisplayMode::Home, frame as f32 / 60.0);
        let scale = accent.transform().scale;
        assert!(scale >= last && scale <= 1.0);
        last = scale;
    }
    assert!((1.0 - last) < 1e-4);
}
