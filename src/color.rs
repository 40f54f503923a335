//! Color helpers for particle palettes.
//!
//! Palette entries are written as sRGB hex strings (`"#FFD700"`) and stored on
//! particles as linear RGB, which is what the shader lights with. Brightness
//! variation is an HSL lightness shift on those linear values, which keeps the
//! hue of each palette entry.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// An sRGB color parsed from a `#RRGGBB` string.
///
/// Serializes back to the same hex form so configs stay hand-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    /// Build a color from 8-bit sRGB channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// The raw 8-bit channels.
    pub fn channels(&self) -> [u8; 3] {
        self.0
    }

    /// Channels as sRGB floats in 0.0..=1.0.
    pub fn srgb(&self) -> Vec3 {
        Vec3::new(
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        )
    }

    /// Channels converted to linear RGB.
    pub fn linear(&self) -> Vec3 {
        srgb_to_linear(self.srgb())
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ColorError(s.to_string()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError(s.to_string()))
        };

        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Hue, saturation and lightness, each in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

fn linear_channel_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}

/// Convert sRGB to linear RGB.
pub fn srgb_to_linear(rgb: Vec3) -> Vec3 {
    Vec3::new(
        srgb_channel_to_linear(rgb.x),
        srgb_channel_to_linear(rgb.y),
        srgb_channel_to_linear(rgb.z),
    )
}

/// Convert linear RGB to sRGB.
pub fn linear_to_srgb(rgb: Vec3) -> Vec3 {
    Vec3::new(
        linear_channel_to_srgb(rgb.x),
        linear_channel_to_srgb(rgb.y),
        linear_channel_to_srgb(rgb.z),
    )
}

/// Convert RGB to HSL.
pub fn rgb_to_hsl(rgb: Vec3) -> Hsl {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let lightness = (min + max) / 2.0;

    if min == max {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: lightness,
        };
    }

    let delta = max - min;
    let saturation = if lightness <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let hue = if max == rgb.x {
        (rgb.y - rgb.z) / delta + if rgb.y < rgb.z { 6.0 } else { 0.0 }
    } else if max == rgb.y {
        (rgb.z - rgb.x) / delta + 2.0
    } else {
        (rgb.x - rgb.y) / delta + 4.0
    };

    Hsl {
        h: hue / 6.0,
        s: saturation,
        l: lightness,
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

/// Convert HSL to RGB.
///
/// Hue wraps; saturation and lightness are clamped to 0.0..=1.0.
pub fn hsl_to_rgb(hsl: Hsl) -> Vec3 {
    let h = hsl.h.rem_euclid(1.0);
    let s = hsl.s.clamp(0.0, 1.0);
    let l = hsl.l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

/// Shift the HSL lightness of a linear color by `delta`.
///
/// The HSL decomposition is taken of the linear channels directly, so a
/// delta of 0.05 moves lightness by 0.05 in the same space the renderer
/// shades in.
pub fn shift_lightness(linear: Vec3, delta: f32) -> Vec3 {
    let mut hsl = rgb_to_hsl(linear);
    hsl.l += delta;
    hsl_to_rgb(hsl)
}
