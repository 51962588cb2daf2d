use std::time::Duration;

use crate::foundation::error::{KloudyError, KloudyResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Refresh rate every per-frame constant in the scene is written against.
pub const REFERENCE_HZ: f64 = 60.0;

/// Elapsed time measured in reference (60 Hz) frames.
///
/// The renderers were tuned as "advance by N per display refresh"; a step of `1.0` reproduces that
/// exactly, fractional or larger steps scale it for other frame rates.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct FrameStep(f64);

impl FrameStep {
    /// One reference frame.
    pub const ONE: Self = Self(1.0);

    /// Build a step from a frame count. Negative or non-finite counts collapse to zero.
    pub fn new(frames: f64) -> Self {
        if frames.is_finite() && frames > 0.0 {
            Self(frames)
        } else {
            Self(0.0)
        }
    }

    /// Convert wall-clock time into reference frames.
    pub fn from_duration(dt: Duration) -> Self {
        Self::new(dt.as_secs_f64() * REFERENCE_HZ)
    }

    /// Step for one frame of an output running at `fps`.
    pub fn for_fps(fps: u32) -> Self {
        if fps == 0 {
            return Self(0.0);
        }
        Self::new(REFERENCE_HZ / f64::from(fps))
    }

    pub fn frames(self) -> f64 {
        self.0
    }

    pub fn as_secs(self) -> f64 {
        self.0 / REFERENCE_HZ
    }

    /// Saturates at `Duration::MAX` for steps too large to represent.
    pub fn as_duration(self) -> Duration {
        Duration::try_from_secs_f64(self.as_secs()).unwrap_or(Duration::MAX)
    }
}

/// Visible page area in CSS pixels plus the device pixel ratio used to size backing surfaces.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> KloudyResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(KloudyError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(KloudyError::validation(
                "viewport device pixel ratio must be > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Whether anything can be drawn. Renderers no-op on degenerate viewports.
    pub fn is_drawable(self) -> bool {
        self.width >= 1.0 && self.height >= 1.0
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Backing surface size in device pixels.
    pub fn pixel_size(self) -> (u32, u32) {
        let px = |v: f64| (v * self.device_pixel_ratio).round().max(0.0) as u32;
        (px(self.width), px(self.height))
    }

    pub fn contains(self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}

/// Opaque 8-bit color, as written in the theme table (`#rrggbb`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> KloudyResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(KloudyError::validation(format!(
                "color '{s}' must be in #rrggbb form"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| KloudyError::validation(format!("color '{s}' is not valid hex")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Comma-separated triple, the form used inside `rgba(...)` color strings.
    pub fn triple(self) -> String {
        format!("{}, {}, {}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba {
            rgb: self,
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }
}

/// Straight-alpha color with a fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl Rgba {
    pub fn scale_alpha(self, k: f32) -> Self {
        self.rgb.with_alpha(self.a * k)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.rgb.r, self.rgb.g, self.rgb.b, a]
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Rgba> for Rgba8Premul {
    fn from(c: Rgba) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self::from_straight_rgba(r, g, b, a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
