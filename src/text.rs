//! Text rasterization into particle targets.
//!
//! A string is drawn into an off-screen grey+alpha canvas, the canvas is scanned
//! on a coarse grid, and every opaque grid cell becomes a candidate 3D point for
//! the text arrangement.
//!
//! Drawing depends on host font support, so it sits behind the narrow
//! [`TextRasterizer`] trait. When no font can be loaded the rasterizer reports
//! `None`, the point pool comes back empty, and the shape generator falls back
//! to the tree positions.
//!
//! ```ignore
//! let settings = RasterSettings::from(&config.text);
//! let rasterizer = default_rasterizer(&config.text);
//! let pool = rasterize_text_to_points(rasterizer.as_ref(), "HELLO", &settings, &mut rng);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use glam::Vec3;
use image::GrayAlphaImage;
use rand::Rng;

use crate::config::TextConfig;
use crate::error::TextError;

/// Bold serif fonts tried, in order, when no font path is configured.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSerifBold.ttf",
    "/Library/Fonts/Times New Roman Bold.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman Bold.ttf",
    "C:\\Windows\\Fonts\\timesbd.ttf",
    "C:\\Windows\\Fonts\\georgiab.ttf",
];

/// Canvas and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub font_size_px: f32,
    pub sample_step_px: u32,
    pub world_scale: f32,
    pub depth_jitter: f32,
    pub alpha_threshold: u8,
}

impl From<&TextConfig> for RasterSettings {
    fn from(config: &TextConfig) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            font_size_px: config.font_size_px,
            sample_step_px: config.sample_step_px,
            world_scale: config.world_scale,
            depth_jitter: config.depth_jitter,
            alpha_threshold: config.alpha_threshold,
        }
    }
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self::from(&TextConfig::default())
    }
}

/// Draws text into an off-screen canvas.
pub trait TextRasterizer {
    /// Render `text` centered on a `canvas_width x canvas_height` canvas.
    ///
    /// Returns `None` when rendering is not available in this environment.
    fn render(&self, text: &str, settings: &RasterSettings) -> Option<GrayAlphaImage>;
}

/// Rasterizer for environments without font support. Never renders anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRasterizer;

impl TextRasterizer for NullRasterizer {
    fn render(&self, _text: &str, _settings: &RasterSettings) -> Option<GrayAlphaImage> {
        None
    }
}

/// Rasterizer backed by a TrueType/OpenType font.
pub struct GlyphRasterizer {
    font: FontVec,
}

impl GlyphRasterizer {
    /// Load a font from raw file contents.
    pub fn from_bytes(data: Vec<u8>, origin: &Path) -> Result<Self, TextError> {
        let font =
            FontVec::try_from_vec(data).map_err(|_| TextError::InvalidFont(origin.to_path_buf()))?;
        Ok(Self { font })
    }

    /// Load a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TextError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| TextError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, path)
    }

    /// Load `explicit` when given, otherwise the first font in
    /// [`FONT_SEARCH_PATHS`] that exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, TextError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = FONT_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .ok_or(TextError::NoFont)?;
        log::debug!("using font {}", path.display());
        Self::from_file(path)
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn render(&self, text: &str, settings: &RasterSettings) -> Option<GrayAlphaImage> {
        let (width, height) = (settings.canvas_width, settings.canvas_height);
        if width == 0 || height == 0 {
            return None;
        }

        let scale = PxScale::from(settings.font_size_px);
        let scaled = self.font.as_scaled(scale);

        // Lay the glyphs out on a single line to measure its advance
        let mut layout: Vec<(GlyphId, f32)> = Vec::with_capacity(text.len());
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            layout.push((id, caret));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        // Horizontally centered, vertically centered on the em box
        let origin_x = (width as f32 - caret) / 2.0;
        let baseline = height as f32 / 2.0 + (scaled.ascent() + scaled.descent()) / 2.0;

        let mut canvas = GrayAlphaImage::new(width, height);
        for (id, x) in layout {
            let glyph = id.with_scale_and_position(scale, point(origin_x + x, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                pixel.0 = [255, pixel.0[1].max(alpha)];
            });
        }

        Some(canvas)
    }
}

/// The best rasterizer this host supports.
///
/// Falls back to [`NullRasterizer`] (with a warning) when no font loads.
pub fn default_rasterizer(config: &TextConfig) -> Box<dyn TextRasterizer> {
    match GlyphRasterizer::discover(config.font_path.as_deref()) {
        Ok(rasterizer) => Box::new(rasterizer),
        Err(e) => {
            log::warn!("text rasterization unavailable: {e}");
            Box::new(NullRasterizer)
        }
    }
}

/// Scan `canvas` on a `sample_step_px` grid and map opaque cells to 3D.
///
/// The canvas center maps to the origin, Y is flipped so up is up, and each
/// point gets a random depth within `depth_jitter`.
pub fn sample_points<R: Rng + ?Sized>(
    canvas: &GrayAlphaImage,
    settings: &RasterSettings,
    rng: &mut R,
) -> Vec<Vec3> {
    let step = settings.sample_step_px.max(1) as usize;
    let (width, height) = canvas.dimensions();
    let half_width = width as f32 / 2.0;
    let half_height = height as f32 / 2.0;

    let mut points = Vec::new();
    for y in (0..height).step_by(step) {
        for x in (0..width).step_by(step) {
            if canvas.get_pixel(x, y).0[1] > settings.alpha_threshold {
                points.push(Vec3::new(
                    (x as f32 - half_width) * settings.world_scale,
                    -(y as f32 - half_height) * settings.world_scale,
                    (rng.gen::<f32>() - 0.5) * 2.0 * settings.depth_jitter,
                ));
            }
        }
    }
    points
}

/// Render `text` and sample it into candidate points.
///
/// Empty when the rasterizer cannot render.
pub fn rasterize_text_to_points<T, R>(
    rasterizer: &T,
    text: &str,
    settings: &RasterSettings,
    rng: &mut R,
) -> Vec<Vec3>
where
    T: TextRasterizer + ?Sized,
    R: Rng + ?Sized,
{
    match rasterizer.render(text, settings) {
        Some(canvas) => sample_points(&canvas, settings, rng),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::LumaA;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Paints a fixed rectangle regardless of the text.
    struct BlockRasterizer;

    impl TextRasterizer for BlockRasterizer {
        fn render(&self, _text: &str, settings: &RasterSettings) -> Option<GrayAlphaImage> {
            let mut canvas = GrayAlphaImage::new(settings.canvas_width, settings.canvas_height);
            for y in 0..4 {
                for x in 0..4 {
                    canvas.put_pixel(x, y, LumaA([255, 255]));
                }
            }
            Some(canvas)
        }
    }

    fn small_settings() -> RasterSettings {
        RasterSettings {
            canvas_width: 16,
            canvas_height: 8,
            font_size_px: 8.0,
            sample_step_px: 2,
            world_scale: 0.5,
            depth_jitter: 1.0,
            alpha_threshold: 128,
        }
    }

    #[test]
    fn test_sample_only_grid_cells_above_threshold() {
        let settings = small_settings();
        let mut canvas = GrayAlphaImage::new(16, 8);
        // On grid and opaque
        canvas.put_pixel(0, 0, LumaA([255, 255]));
        canvas.put_pixel(8, 4, LumaA([255, 200]));
        // Off grid
        canvas.put_pixel(3, 3, LumaA([255, 255]));
        // At the threshold, which is not above it
        canvas.put_pixel(2, 2, LumaA([255, 128]));

        let mut rng = StdRng::seed_from_u64(1);
        let points = sample_points(&canvas, &settings, &mut rng);
        assert_eq!(points.len(), 2);

        // (0, 0) is the top-left corner: left of and above the center
        assert_eq!(points[0].x, (0.0 - 8.0) * 0.5);
        assert_eq!(points[0].y, 4.0 * 0.5);
        // (8, 4) is the canvas center
        assert_eq!(points[1].x, 0.0);
        assert_eq!(points[1].y, 0.0);

        for p in &points {
            assert!(p.z >= -1.0 && p.z <= 1.0);
        }
    }

    #[test]
    fn test_blank_canvas_gives_no_points() {
        let settings = small_settings();
        let canvas = GrayAlphaImage::new(16, 8);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(sample_points(&canvas, &settings, &mut rng).is_empty());
    }

    #[test]
    fn test_null_rasterizer_yields_empty_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let points =
            rasterize_text_to_points(&NullRasterizer, "HELLO", &RasterSettings::default(), &mut rng);
        assert!(points.is_empty());
    }

    #[test]
    fn test_rasterize_through_trait_object() {
        let rasterizer: Box<dyn TextRasterizer> = Box::new(BlockRasterizer);
        let mut rng = StdRng::seed_from_u64(4);
        let points =
            rasterize_text_to_points(rasterizer.as_ref(), "X", &small_settings(), &mut rng);
        // A 4x4 block sampled every 2 px hits (0,0) (2,0) (0,2) (2,2)
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let result = GlyphRasterizer::from_file("/definitely/not/a/font.ttf");
        assert!(matches!(result, Err(TextError::Io { .. })));
    }

    #[test]
    fn test_garbage_font_bytes_are_rejected() {
        let result = GlyphRasterizer::from_bytes(vec![0u8; 64], Path::new("junk.ttf"));
        assert!(matches!(result, Err(TextError::InvalidFont(_))));
    }

    #[test]
    fn test_system_font_renders_centered_text() {
        // Only meaningful on hosts that ship one of the known fonts
        let Ok(rasterizer) = GlyphRasterizer::discover(None) else {
            return;
        };
        let settings = RasterSettings {
            canvas_width: 400,
            canvas_height: 100,
            font_size_px: 60.0,
            ..RasterSettings::default()
        };
        let canvas = rasterizer.render("HI", &settings).unwrap();
        let opaque: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[1] > 128)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!opaque.is_empty());

        let mean_x = opaque.iter().map(|(x, _)| *x as f32).sum::<f32>() / opaque.len() as f32;
        assert!((mean_x - 200.0).abs() < 40.0, "text not centered: {mean_x}");
    }
}
