use std::f64::consts::TAU;

use crate::{
    foundation::core::{FrameStep, Point, Viewport},
    render::plan::{DrawOp, LayerPlan},
    scene::{FrameCtx, Layer, uniform},
    theme::Theme,
};

pub const STAR_COUNT: usize = 40;
pub const STARFIELD_Z: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Point,
    pub radius: f64,
    pub base_opacity: f64,
    pub phase: f64,
    /// Phase advance per reference frame.
    pub speed: f64,
}

impl Star {
    pub fn random(viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        Self {
            position: Point::new(
                uniform(rng, 0.0, viewport.width),
                uniform(rng, 0.0, viewport.height),
            ),
            radius: uniform(rng, 0.3, 1.8),
            base_opacity: uniform(rng, 0.03, 0.15),
            phase: uniform(rng, 0.0, TAU),
            speed: uniform(rng, 0.005, 0.02),
        }
    }

    /// Brightness factor in `[0.3, 1.0]`.
    pub fn twinkle(&self) -> f64 {
        0.3 + 0.7 * self.phase.sin().powi(2)
    }

    pub fn opacity(&self) -> f64 {
        self.base_opacity * self.twinkle()
    }

    pub fn advance(self, step: FrameStep) -> Self {
        Self {
            phase: self.phase + self.speed * step.frames(),
            ..self
        }
    }
}

/// Stars are created once and live for the whole session; only their phase changes.
#[derive(Clone, Debug, Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn scatter(count: usize, viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        Self {
            stars: (0..count).map(|_| Star::random(viewport, rng)).collect(),
        }
    }

    pub fn from_stars(stars: Vec<Star>) -> Self {
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn advance(self, step: FrameStep) -> Self {
        Self {
            stars: self.stars.into_iter().map(|s| s.advance(step)).collect(),
        }
    }

    pub fn plan(&self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new("stars", STARFIELD_Z);
        if !viewport.is_drawable() {
            return layer;
        }
        let rgb = theme.particle_rgb();
        layer.ops = self
            .stars
            .iter()
            .map(|s| DrawOp::circle(s.position, s.radius, rgb.with_alpha(s.opacity() as f32)))
            .collect();
        layer
    }
}

pub struct StarfieldLayer {
    field: Starfield,
}

impl StarfieldLayer {
    pub fn new(count: usize, viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        Self {
            field: Starfield::scatter(count, viewport, rng),
        }
    }
}

impl Layer for StarfieldLayer {
    fn name(&self) -> &'static str {
        "stars"
    }

    fn z(&self) -> i32 {
        STARFIELD_Z
    }

    fn advance(&mut self, ctx: &FrameCtx<'_>, _rng: &mut fastrand::Rng) {
        self.field = std::mem::take(&mut self.field).advance(ctx.step);
    }

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan {
        self.field.plan(ctx.viewport, ctx.theme)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/starfield.rs"]
mod tests;
