//! Built-in color themes.
//!
//! A theme is chosen once when the page is built and handed to every layer; nothing reads a
//! process-wide theme.

use std::{fmt, str::FromStr};

use crate::foundation::{
    core::{Rgb, Rgba},
    error::{KloudyError, KloudyResult},
};

/// Theme compiled in as the default. Switching it is a rebuild (or a config override), never a
/// runtime mutation.
pub const ACTIVE_THEME: ThemeName = ThemeName::Light;

/// Names of the built-in themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
    Midnight,
    Sunset,
}

impl ThemeName {
    pub const ALL: [ThemeName; 4] = [Self::Dark, Self::Light, Self::Midnight, Self::Sunset];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Midnight => "midnight",
            Self::Sunset => "sunset",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = KloudyError;

    fn from_str(s: &str) -> KloudyResult<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                KloudyError::validation(format!(
                    "unknown theme '{s}' (expected one of: dark, light, midnight, sunset)"
                ))
            })
    }
}

/// Immutable color/intensity record read by every layer and by the contact overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Theme {
    pub name: ThemeName,
    pub background: Rgb,
    pub text: Rgb,
    pub text_muted: Rgba,
    /// Grid line color. Its RGB triple is also the base for every translucent grid stroke.
    pub grid: Rgb,
    /// Shadow color behind the horizon; may be darker than `grid`.
    pub glow: Rgb,
    /// Glow multiplier (1 = normal, higher = stronger).
    pub glow_intensity: f64,
}

impl Theme {
    pub fn builtin(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                name,
                background: Rgb::BLACK,
                text: Rgb::WHITE,
                text_muted: Rgb::WHITE.with_alpha(0.7),
                grid: Rgb::WHITE,
                glow: Rgb::WHITE,
                glow_intensity: 1.0,
            },
            ThemeName::Light => Self {
                name,
                background: Rgb::WHITE,
                text: Rgb::new(0x3a, 0x3a, 0x3c),
                text_muted: Rgb::new(0x3a, 0x3a, 0x3c).with_alpha(0.6),
                grid: Rgb::new(0x3a, 0x3a, 0x3c),
                glow: Rgb::new(0x1a, 0x1a, 0x1c),
                glow_intensity: 1.0,
            },
            ThemeName::Midnight => Self {
                name,
                background: Rgb::new(0x0a, 0x0a, 0x1a),
                text: Rgb::new(0xa0, 0xa0, 0xff),
                text_muted: Rgb::new(0xa0, 0xa0, 0xff).with_alpha(0.6),
                grid: Rgb::new(0x60, 0x60, 0xff),
                glow: Rgb::new(0x80, 0x80, 0xff),
                glow_intensity: 1.0,
            },
            ThemeName::Sunset => Self {
                name,
                background: Rgb::new(0x1a, 0x0a, 0x0a),
                text: Rgb::new(0xff, 0x90, 0x60),
                text_muted: Rgb::new(0xff, 0x90, 0x60).with_alpha(0.6),
                grid: Rgb::new(0xff, 0x60, 0x30),
                glow: Rgb::new(0xff, 0x80, 0x50),
                glow_intensity: 1.0,
            },
        }
    }

    pub fn active() -> Self {
        Self::builtin(ACTIVE_THEME)
    }

    pub fn grid_hex(&self) -> String {
        self.grid.to_hex()
    }

    pub fn grid_rgb_triple(&self) -> String {
        self.grid.triple()
    }

    pub fn is_dark(&self) -> bool {
        matches!(
            self.name,
            ThemeName::Dark | ThemeName::Midnight | ThemeName::Sunset
        )
    }

    /// Color of stars and streaks: white on dark themes, graphite otherwise.
    pub fn particle_rgb(&self) -> Rgb {
        if self.is_dark() {
            Rgb::WHITE
        } else {
            Rgb::new(58, 58, 60)
        }
    }

    /// Label color on grid-colored buttons.
    pub fn on_grid_rgb(&self) -> Rgb {
        if self.is_dark() {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::active()
    }
}

#[cfg(test)]
#[path = "../tests/unit/theme.rs"]
mod tests;
