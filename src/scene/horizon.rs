use kurbo::{ParamCurve as _, QuadBez};

use crate::{
    foundation::{
        core::{BezPath, FrameStep, Point, Rgb, Vec2, Viewport},
        math::{arc_lift_at, lerp},
    },
    render::plan::{DrawOp, GlowPass, LayerPlan},
    scene::{FrameCtx, Layer},
    theme::Theme,
};

pub const HORIZON_Z: i32 = 10;

/// Horizon height as a fraction of the viewport height.
const HORIZON_FRACTION: f64 = 0.55;
/// Scales every curvature in the layer (lower is flatter).
const CURVE_SCALE: f64 = 0.45;
const CURVE_AMOUNT: f64 = 150.0 * CURVE_SCALE;
const TIME_PER_FRAME: f64 = 0.02;

const GLOW_STROKE: f64 = 3.5;
const GLOW_OFFSET_Y: f64 = -25.0;

/// `(y offset below the horizon, curve base, opacity)`, top to bottom.
const GRID_ARCS: [(f64, f64, f32); 6] = [
    (12.0, 140.0, 0.25),
    (26.0, 125.0, 0.2),
    (42.0, 110.0, 0.15),
    (60.0, 95.0, 0.1),
    (80.0, 78.0, 0.06),
    (102.0, 60.0, 0.03),
];
const GRID_ARC_WIDTH: f64 = 1.5;

const VERTICALS_PER_SIDE: i32 = 5;
const GRID_DEPTH: f64 = 75.0;
/// Segments used to approximate the vertical gradient stroke.
const GRADIENT_STEPS: usize = 8;

/// Animation clock of the horizon layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Horizon {
    pub time: f64,
}

/// One longitude line: a quadratic from just under the horizon down into the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertical {
    pub start: Point,
    pub ctrl: Point,
    pub end: Point,
}

impl Horizon {
    pub fn advance(self, step: FrameStep) -> Self {
        Self {
            time: self.time + TIME_PER_FRAME * step.frames(),
        }
    }

    /// Slow glow pulse in `[0.7, 1.0]`.
    pub fn breathe(self) -> f64 {
        0.85 + 0.15 * (self.time * 0.5).sin()
    }

    pub fn plan(self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new("horizon", HORIZON_Z);
        if !viewport.is_drawable() {
            return layer;
        }
        let (w, hy) = (viewport.width, horizon_y(viewport));
        let horizon = arc(w, hy, CURVE_AMOUNT);
        let breathe = self.breathe();

        layer.glow = Some(GlowPass {
            ops: vec![DrawOp::StrokePath {
                path: horizon.clone(),
                width: GLOW_STROKE,
                color: theme.glow.opaque(),
            }],
            blur_px: 100.0 * breathe,
            offset: Vec2::new(0.0, GLOW_OFFSET_Y),
            opacity: theme.glow_intensity.clamp(0.0, 1.0) as f32,
            repeats: 2,
        });

        let grid = theme.grid;
        // The shadowed stroke is laid down twice, then a crisp line on top.
        for _ in 0..2 {
            layer.ops.push(DrawOp::StrokePath {
                path: horizon.clone(),
                width: GLOW_STROKE,
                color: grid.opaque(),
            });
        }
        layer.ops.push(DrawOp::StrokePath {
            path: horizon,
            width: 1.0,
            color: grid.opaque(),
        });

        for (y_offset, curve_base, opacity) in GRID_ARCS {
            layer.ops.push(DrawOp::StrokePath {
                path: arc(w, hy + y_offset, curve_base * CURVE_SCALE),
                width: GRID_ARC_WIDTH,
                color: grid.with_alpha(opacity),
            });
        }

        for v in verticals(viewport) {
            push_gradient_stroke(&mut layer.ops, v, grid);
        }
        layer
    }
}

pub fn horizon_y(viewport: Viewport) -> f64 {
    viewport.height * HORIZON_FRACTION
}

/// Height of the horizon curve at horizontal position `x`.
pub fn horizon_curve_y(viewport: Viewport, x: f64) -> f64 {
    let t = x / viewport.width;
    horizon_y(viewport) - arc_lift_at(t, CURVE_AMOUNT)
}

pub fn verticals(viewport: Viewport) -> Vec<Vertical> {
    let (w, hy) = (viewport.width, horizon_y(viewport));
    (-VERTICALS_PER_SIDE..=VERTICALS_PER_SIDE)
        .map(|i| {
            let ratio = f64::from(i) / f64::from(VERTICALS_PER_SIDE);
            let x = w / 2.0 + ratio * (w * 0.48);
            let t = x / w;
            let start_y = horizon_curve_y(viewport, x) + 3.0;
            let end_y = hy + GRID_DEPTH - arc_lift_at(t, 85.0 * CURVE_SCALE);
            Vertical {
                start: Point::new(x, start_y),
                ctrl: Point::new(x + ratio * 55.0, start_y + (end_y - start_y) * 0.3),
                end: Point::new(x - ratio, end_y),
            }
        })
        .collect()
}

/// Alpha of the vertical fade at fraction `f` of the way down.
pub fn vertical_alpha(f: f64) -> f64 {
    let f = f.clamp(0.0, 1.0);
    if f <= 0.7 {
        lerp(0.2, 0.12, f / 0.7)
    } else {
        lerp(0.12, 0.04, (f - 0.7) / 0.3)
    }
}

fn arc(width: f64, y: f64, lift: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(0.0, y));
    path.quad_to(Point::new(width / 2.0, y - lift), Point::new(width, y));
    path
}

/// Stroke `v` in short pieces whose alpha follows the vertical gradient.
fn push_gradient_stroke(ops: &mut Vec<DrawOp>, v: Vertical, rgb: Rgb) {
    let quad = QuadBez::new(v.start, v.ctrl, v.end);
    let span = v.end.y - v.start.y;
    for k in 0..GRADIENT_STEPS {
        let t0 = k as f64 / GRADIENT_STEPS as f64;
        let t1 = (k + 1) as f64 / GRADIENT_STEPS as f64;
        let piece = quad.subsegment(t0..t1);
        let mid_y = quad.eval((t0 + t1) / 2.0).y;
        let f = if span.abs() > f64::EPSILON {
            (mid_y - v.start.y) / span
        } else {
            0.0
        };
        ops.push(DrawOp::quad_stroke(
            piece.p0,
            piece.p1,
            piece.p2,
            1.0,
            rgb.with_alpha(vertical_alpha(f) as f32),
        ));
    }
}

#[derive(Default)]
pub struct HorizonLayer {
    horizon: Horizon,
}

impl HorizonLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Layer for HorizonLayer {
    fn name(&self) -> &'static str {
        "horizon"
    }

    fn z(&self) -> i32 {
        HORIZON_Z
    }

    fn advance(&mut self, ctx: &FrameCtx<'_>, _rng: &mut fastrand::Rng) {
        self.horizon = self.horizon.advance(ctx.step);
    }

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan {
        self.horizon.plan(ctx.viewport, ctx.theme)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/horizon.rs"]
mod tests;
