//! Site configuration loaded from JSON.

use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};

use crate::{
    foundation::error::{KloudyError, KloudyResult},
    scene::{parallax::InputMode, shooting_stars::SPAWN_CHANCE, starfield::STAR_COUNT},
    theme::{ACTIVE_THEME, ThemeName},
};

pub const ACCESS_KEY_ENV: &str = "WEB3FORMS_ACCESS_KEY";
pub const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_ACCESS_KEY";
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.web3forms.com/submit";

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// Curved glowing horizon over a spherical grid.
    #[default]
    Curved,
    /// Flat grid scrolling toward the viewer.
    Perspective,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxSettings {
    pub hero_intensity: f64,
    pub tagline_intensity: f64,
    /// Touch intensity as a multiple of the pointer intensity.
    pub touch_multiplier: f64,
    pub input: InputMode,
    pub orientation_needs_permission: bool,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            hero_intensity: 0.5,
            tagline_intensity: 0.3,
            touch_multiplier: 2.0,
            input: InputMode::Pointer,
            orientation_needs_permission: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelaySettings {
    pub endpoint: String,
    /// `None` falls back to `$WEB3FORMS_ACCESS_KEY`, then to a placeholder key.
    pub access_key: Option<String>,
    pub from_name: String,
    pub timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            access_key: None,
            from_name: "KloudySky Contact Form".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RelaySettings {
    /// Access key from config, then the environment, then the placeholder.
    pub fn resolved_access_key(&self) -> String {
        self.access_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(ACCESS_KEY_ENV).ok().filter(|k| !k.is_empty()))
            .unwrap_or_else(|| PLACEHOLDER_ACCESS_KEY.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site_name: String,
    pub theme: ThemeName,
    pub grid_style: GridStyle,
    pub star_count: usize,
    pub shooting_star_chance: f64,
    pub parallax: ParallaxSettings,
    pub relay: RelaySettings,
    pub auto_close_ms: u64,
    pub fonts_dir: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "KloudySky".to_string(),
            theme: ACTIVE_THEME,
            grid_style: GridStyle::Curved,
            star_count: STAR_COUNT,
            shooting_star_chance: SPAWN_CHANCE,
            parallax: ParallaxSettings::default(),
            relay: RelaySettings::default(),
            auto_close_ms: 2000,
            fonts_dir: None,
        }
    }
}

impl SiteConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> KloudyResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| KloudyError::config(format!("parse site config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> KloudyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KloudyError::config(format!("open site config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> KloudyResult<()> {
        if !(0.0..=1.0).contains(&self.shooting_star_chance) {
            return Err(KloudyError::config(
                "shooting_star_chance must be within [0, 1]",
            ));
        }
        let p = &self.parallax;
        for (name, v) in [
            ("parallax.hero_intensity", p.hero_intensity),
            ("parallax.tagline_intensity", p.tagline_intensity),
            ("parallax.touch_multiplier", p.touch_multiplier),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(KloudyError::config(format!("{name} must be > 0")));
            }
        }
        if self.relay.endpoint.trim().is_empty() {
            return Err(KloudyError::config("relay.endpoint must not be empty"));
        }
        if self.relay.timeout_secs == 0 {
            return Err(KloudyError::config("relay.timeout_secs must be > 0"));
        }
        Ok(())
    }

    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
