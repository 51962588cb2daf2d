use std::f64::consts::FRAC_PI_4;

use crate::{
    animation::trail::TrailRing,
    foundation::{
        core::{FrameStep, Point, Vec2, Viewport},
        math::chance_over,
    },
    render::plan::{DrawOp, LayerPlan},
    scene::{FrameCtx, Layer, uniform},
    theme::Theme,
};

/// Spawn probability per reference frame.
pub const SPAWN_CHANCE: f64 = 0.003;
pub const SHOOTING_STARS_Z: i32 = 6;

/// Distance past the right/bottom edge after which a streak is retired.
const OFFSCREEN_MARGIN: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub position: Point,
    pub opacity: f64,
}

#[derive(Clone, Debug)]
pub struct ShootingStar {
    pub head: Point,
    pub length: f64,
    /// Distance travelled per reference frame.
    pub speed: f64,
    pub opacity: f64,
    pub angle: f64,
    pub active: bool,
    trail: TrailRing<TrailSample>,
}

impl ShootingStar {
    /// Trail capacity is half the streak length, rounded down.
    pub fn new(head: Point, length: f64, speed: f64, opacity: f64, angle: f64) -> Self {
        let capacity = (length / 2.0).floor().max(1.0) as usize;
        Self {
            head,
            length,
            speed,
            opacity,
            angle,
            active: true,
            trail: TrailRing::with_capacity(capacity),
        }
    }

    /// A mostly diagonal streak starting in the upper-left part of the viewport.
    pub fn spawn(viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        let angle = FRAC_PI_4 + (rng.f64() - 0.5) * 0.3;
        let head = Point::new(
            uniform(rng, 0.0, viewport.width * 0.8),
            uniform(rng, 0.0, viewport.height * 0.4),
        );
        let length = uniform(rng, 40.0, 120.0);
        let speed = uniform(rng, 6.0, 14.0);
        let opacity = uniform(rng, 0.2, 0.6);
        Self::new(head, length, speed, opacity, angle)
    }

    pub fn trail(&self) -> &TrailRing<TrailSample> {
        &self.trail
    }

    /// Move the head, record it, and retire the streak once it has left the viewport.
    pub fn advance(mut self, step: FrameStep, viewport: Viewport) -> Self {
        let dir = Vec2::new(self.angle.cos(), self.angle.sin());
        self.head += dir * (self.speed * step.frames());
        self.trail.push_front(TrailSample {
            position: self.head,
            opacity: self.opacity,
        });
        if self.head.x > viewport.width + OFFSCREEN_MARGIN
            || self.head.y > viewport.height + OFFSCREEN_MARGIN
        {
            self.active = false;
        }
        self
    }

    /// Trail dots from newest to oldest: radius `2(1 - j/n)`, opacity `opacity(1 - j/n)`.
    pub fn dots(&self) -> impl Iterator<Item = (Point, f64, f64)> + '_ {
        let n = self.trail.len() as f64;
        self.trail.iter().enumerate().map(move |(j, sample)| {
            let fade = 1.0 - j as f64 / n;
            (sample.position, 2.0 * fade, sample.opacity * fade)
        })
    }
}

#[derive(Clone, Debug)]
pub struct ShootingStars {
    streaks: Vec<ShootingStar>,
    chance: f64,
}

impl Default for ShootingStars {
    fn default() -> Self {
        Self::new(SPAWN_CHANCE)
    }
}

impl ShootingStars {
    pub fn new(chance: f64) -> Self {
        Self {
            streaks: Vec::new(),
            chance: chance.clamp(0.0, 1.0),
        }
    }

    pub fn streaks(&self) -> &[ShootingStar] {
        &self.streaks
    }

    pub fn with_streak(mut self, streak: ShootingStar) -> Self {
        self.streaks.push(streak);
        self
    }

    /// One simulation pass: maybe spawn, drop streaks retired last pass, advance the rest.
    pub fn advance(mut self, step: FrameStep, viewport: Viewport, rng: &mut fastrand::Rng) -> Self {
        if step.frames() > 0.0 && rng.f64() < chance_over(self.chance, step.frames()) {
            let streak = ShootingStar::spawn(viewport, rng);
            tracing::debug!(x = streak.head.x, y = streak.head.y, "shooting star spawned");
            self.streaks.push(streak);
        }

        let before = self.streaks.len();
        self.streaks.retain(|s| s.active);
        if self.streaks.len() != before {
            tracing::debug!(removed = before - self.streaks.len(), "shooting stars retired");
        }

        self.streaks = self
            .streaks
            .into_iter()
            .map(|s| s.advance(step, viewport))
            .collect();
        self
    }

    pub fn plan(&self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new("shooting-stars", SHOOTING_STARS_Z);
        if !viewport.is_drawable() {
            return layer;
        }
        let rgb = theme.particle_rgb();
        for streak in &self.streaks {
            for (center, radius, opacity) in streak.dots() {
                layer
                    .ops
                    .push(DrawOp::circle(center, radius, rgb.with_alpha(opacity as f32)));
            }
        }
        layer
    }
}

pub struct ShootingStarsLayer {
    sky: ShootingStars,
}

impl ShootingStarsLayer {
    pub fn new(chance: f64) -> Self {
        Self {
            sky: ShootingStars::new(chance),
        }
    }
}

impl Layer for ShootingStarsLayer {
    fn name(&self) -> &'static str {
        "shooting-stars"
    }

    fn z(&self) -> i32 {
        SHOOTING_STARS_Z
    }

    fn advance(&mut self, ctx: &FrameCtx<'_>, rng: &mut fastrand::Rng) {
        self.sky = std::mem::take(&mut self.sky).advance(ctx.step, ctx.viewport, rng);
    }

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan {
        self.sky.plan(ctx.viewport, ctx.theme)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shooting_stars.rs"]
mod tests;
