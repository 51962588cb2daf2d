use crate::{
    foundation::core::{FrameStep, Point, Rect, Viewport},
    render::plan::{DrawOp, LayerPlan},
    scene::{FrameCtx, Layer},
    theme::Theme,
};

pub const PERSPECTIVE_Z: i32 = 10;

const HORIZON_FRACTION: f64 = 0.35;
const FADE_FRACTION: f64 = 0.75;
const SPACING: f64 = 60.0;
const SCROLL_PER_FRAME: f64 = 0.5;
const FOCAL: f64 = 400.0;
const ROWS: usize = 30;
const COLUMNS_PER_SIDE: i32 = 18;
const GLOW_HALF_HEIGHT: f64 = 20.0;
const GLOW_STRIPS: usize = 10;

/// Flat grid scrolling toward the viewer under a horizon at 35% height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerspectiveGrid {
    pub offset: f64,
}

/// One visible horizontal row of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridRow {
    pub y: f64,
    pub scale: f64,
    pub half_width: f64,
    pub alpha: f64,
    pub curvature: f64,
}

impl PerspectiveGrid {
    pub fn advance(self, step: FrameStep) -> Self {
        Self {
            offset: self.offset + SCROLL_PER_FRAME * step.frames(),
        }
    }

    pub fn rows(self, viewport: Viewport) -> Vec<GridRow> {
        let (w, h) = (viewport.width, viewport.height);
        let hy = h * HORIZON_FRACTION;
        let fade = h * FADE_FRACTION;
        (0..ROWS)
            .filter_map(|i| {
                let z = i as f64 * SPACING + self.offset.rem_euclid(SPACING);
                let scale = FOCAL / (FOCAL + z);
                let y = hy + (h - hy) * (1.0 - scale);
                if y >= fade || scale < 0.02 {
                    return None;
                }
                Some(GridRow {
                    y,
                    scale,
                    half_width: w * scale * 0.9,
                    alpha: (scale * 0.6).min(0.5),
                    curvature: (1.0 - scale) * -35.0,
                })
            })
            .collect()
    }

    pub fn plan(self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new("perspective-grid", PERSPECTIVE_Z);
        if !viewport.is_drawable() {
            return layer;
        }
        let (w, h) = (viewport.width, viewport.height);
        let hy = h * HORIZON_FRACTION;
        let fade = h * FADE_FRACTION;
        let vx = w / 2.0;

        // Soft band around the horizon, peaking on the line itself.
        let strip = 2.0 * GLOW_HALF_HEIGHT / GLOW_STRIPS as f64;
        for k in 0..GLOW_STRIPS {
            let top = hy - GLOW_HALF_HEIGHT + k as f64 * strip;
            let center = top + strip / 2.0;
            let alpha = 0.15 * (1.0 - ((center - hy) / GLOW_HALF_HEIGHT).abs());
            layer.ops.push(DrawOp::rect(
                Rect::new(0.0, top, w, top + strip),
                theme.glow.with_alpha(alpha as f32),
            ));
        }

        for row in self.rows(viewport) {
            layer.ops.push(DrawOp::quad_stroke(
                Point::new(vx - row.half_width, row.y),
                Point::new(vx, row.y + row.curvature),
                Point::new(vx + row.half_width, row.y),
                1.2,
                theme.grid.with_alpha(row.alpha as f32),
            ));
        }

        for i in -COLUMNS_PER_SIDE..=COLUMNS_PER_SIDE {
            if i == 0 {
                continue;
            }
            let x_at_bottom = vx + f64::from(i) * SPACING;
            let bow = f64::from(i.abs()) / f64::from(COLUMNS_PER_SIDE) * w * 0.08;
            let dir = f64::from(i.signum());
            layer.ops.push(DrawOp::quad_stroke(
                Point::new(vx, hy),
                Point::new(vx + dir * bow, (hy + fade) / 2.0),
                Point::new(x_at_bottom * (fade / h), fade),
                1.0,
                theme.grid.with_alpha(0.4),
            ));
        }
        layer
    }
}

#[derive(Default)]
pub struct PerspectiveLayer {
    grid: PerspectiveGrid,
}

impl PerspectiveLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for PerspectiveLayer {
    fn name(&self) -> &'static str {
        "perspective-grid"
    }

    fn z(&self) -> i32 {
        PERSPECTIVE_Z
    }

    fn advance(&mut self, ctx: &FrameCtx<'_>, _rng: &mut fastrand::Rng) {
        self.grid = self.grid.advance(ctx.step);
    }

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan {
        self.grid.plan(ctx.viewport, ctx.theme)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/perspective.rs"]
mod tests;
