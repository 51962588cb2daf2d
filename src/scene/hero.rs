use crate::{
    foundation::core::{FrameStep, Point, Viewport},
    render::plan::{DrawOp, FontFamily, LayerPlan, TextAlign, TextRun},
    scene::{
        FrameCtx, Layer, SceneInput,
        parallax::{Parallax, ParallaxConfig},
    },
    theme::Theme,
};

pub const HERO_Z: i32 = 30;

pub const TITLE: &str = "KloudySky";
pub const TAGLINE: &str = "Connect with us";

const CURSOR_PERIOD_SECS: f64 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroRole {
    /// Brand title, top edge at 35% of the viewport height.
    Title,
    /// Monospace tagline with a blinking cursor, bottom edge 28% above the viewport bottom.
    Tagline,
}

/// Title font size for a viewport width (responsive breakpoints at 768 and 1024).
pub fn title_size(width: f64) -> f64 {
    if width >= 1024.0 {
        72.0
    } else if width >= 768.0 {
        60.0
    } else {
        48.0
    }
}

/// Tagline `(font size, line height)` for a viewport width (breakpoints at 640 and 768).
pub fn tagline_size(width: f64) -> (f64, f64) {
    if width >= 768.0 {
        (18.0, 28.0)
    } else if width >= 640.0 {
        (16.0, 24.0)
    } else {
        (14.0, 20.0)
    }
}

/// The cursor shows for the first half of every 1.2 s cycle.
pub fn cursor_visible(clock_secs: f64) -> bool {
    clock_secs.rem_euclid(CURSOR_PERIOD_SECS) / CURSOR_PERIOD_SECS < 0.5
}

/// Text block wrapped in a parallax offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroText {
    role: HeroRole,
    parallax: Parallax,
    clock_secs: f64,
}

impl HeroText {
    pub fn new(role: HeroRole, config: ParallaxConfig) -> Self {
        Self {
            role,
            parallax: Parallax::new(config),
            clock_secs: 0.0,
        }
    }

    pub fn role(&self) -> HeroRole {
        self.role
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    pub fn advance(self, step: FrameStep) -> Self {
        Self {
            parallax: self.parallax.advance(step),
            clock_secs: self.clock_secs + step.as_secs(),
            ..self
        }
    }

    pub fn on_input(&mut self, input: &SceneInput, viewport: Viewport) -> bool {
        match *input {
            SceneInput::PointerMove(p) => {
                self.parallax.on_pointer_move(p, viewport);
                false
            }
            SceneInput::TouchStart => self.parallax.on_touch_start(),
            SceneInput::Orientation { beta, gamma } => {
                self.parallax.on_orientation(beta, gamma);
                false
            }
            SceneInput::PermissionResult(granted) => {
                self.parallax.resolve_permission(granted);
                false
            }
        }
    }

    pub fn text_run(&self, viewport: Viewport, theme: &Theme) -> TextRun {
        let (w, h) = (viewport.width, viewport.height);
        match self.role {
            HeroRole::Title => {
                let size = title_size(w);
                TextRun {
                    text: TITLE.to_string(),
                    family: FontFamily::Sans,
                    size_px: size,
                    weight: 500,
                    letter_spacing_em: -0.025,
                    align: TextAlign::Center,
                    // Line height equals the font size; the baseline sits ~0.8 em below the top.
                    origin: Point::new(w / 2.0, h * 0.35 + size * 0.8),
                    color: theme.text.opaque(),
                    cursor: None,
                }
            }
            HeroRole::Tagline => {
                let (size, line_height) = tagline_size(w);
                let bottom = h * (1.0 - 0.28);
                TextRun {
                    text: TAGLINE.to_string(),
                    family: FontFamily::Mono,
                    size_px: size,
                    weight: 400,
                    letter_spacing_em: 0.0,
                    align: TextAlign::Center,
                    origin: Point::new(w / 2.0, bottom - (line_height - size) / 2.0 - size * 0.2),
                    color: theme.text_muted,
                    cursor: Some(cursor_visible(self.clock_secs)),
                }
            }
        }
    }

    pub fn plan(&self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new(self.layer_name(), HERO_Z);
        if !viewport.is_drawable() {
            return layer;
        }
        layer.offset = self.parallax.offset();
        layer.ops.push(DrawOp::Text(self.text_run(viewport, theme)));
        layer
    }

    fn layer_name(&self) -> &'static str {
        match self.role {
            HeroRole::Title => "hero-title",
            HeroRole::Tagline => "hero-tagline",
        }
    }
}

impl Layer for HeroText {
    fn name(&self) -> &'static str {
        self.layer_name()
    }

    fn z(&self) -> i32 {
        HERO_Z
    }

    fn advance(&mut self, ctx: &FrameCtx<'_>, _rng: &mut fastrand::Rng) {
        *self = HeroText::advance(*self, ctx.step);
    }

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan {
        HeroText::plan(self, ctx.viewport, ctx.theme)
    }

    fn on_input(&mut self, input: &SceneInput, viewport: Viewport) -> bool {
        HeroText::on_input(self, input, viewport)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/hero.rs"]
mod tests;
