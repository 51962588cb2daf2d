//! Animated hero layers.
//!
//! Each layer owns its simulation state, advances once per frame and emits a [`LayerPlan`].
//! The state types expose pure `advance(self, ..) -> Self` transitions; the [`Layer`] impls are
//! thin adapters the page drives.

use crate::{
    foundation::core::{FrameStep, Point, Viewport},
    render::plan::LayerPlan,
    theme::Theme,
};

/// Hero title and tagline.
pub mod hero;
/// Curved horizon with a spherical grid beneath it.
pub mod horizon;
/// Pointer and device-tilt parallax offsets.
pub mod parallax;
/// Flat scrolling perspective grid.
pub mod perspective;
/// Diagonal streaks with fading trails.
pub mod shooting_stars;
/// Fixed set of twinkling points.
pub mod starfield;

/// Read-only inputs shared by every layer for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx<'a> {
    pub viewport: Viewport,
    pub theme: &'a Theme,
    pub step: FrameStep,
}

/// Input routed from the page to every mounted layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneInput {
    PointerMove(Point),
    TouchStart,
    /// Device orientation sample in degrees.
    Orientation { beta: f64, gamma: f64 },
    PermissionResult(bool),
}

pub trait Layer {
    fn name(&self) -> &'static str;

    fn z(&self) -> i32;

    fn advance(&mut self, ctx: &FrameCtx<'_>, rng: &mut fastrand::Rng);

    fn plan(&self, ctx: &FrameCtx<'_>) -> LayerPlan;

    /// React to input. Returns `true` when an orientation permission request must be issued.
    fn on_input(&mut self, _input: &SceneInput, _viewport: Viewport) -> bool {
        false
    }
}

/// Uniform sample in `[lo, hi)`.
pub(crate) fn uniform(rng: &mut fastrand::Rng, lo: f64, hi: f64) -> f64 {
    lo + rng.f64() * (hi - lo)
}
