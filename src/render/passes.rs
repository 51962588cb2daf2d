use crate::{
    foundation::error::KloudyResult,
    render::{
        backend::FrameRGBA,
        plan::{FramePlan, GlowPass, LayerPlan},
    },
};

/// Primitive steps a backend must provide to execute a [`FramePlan`].
pub trait PassBackend {
    /// Size the frame surface for the plan's viewport and clear it.
    fn begin_frame(&mut self, plan: &FramePlan) -> KloudyResult<()>;

    /// Draw `glow` offscreen, blur it and composite it over the frame.
    fn exec_glow(&mut self, layer: &LayerPlan, glow: &GlowPass, plan: &FramePlan)
    -> KloudyResult<()>;

    /// Draw the layer's ops into its surface and composite it over the frame.
    fn exec_layer(&mut self, layer: &LayerPlan, plan: &FramePlan) -> KloudyResult<()>;

    fn readback_rgba8(&mut self, plan: &FramePlan) -> KloudyResult<FrameRGBA>;
}

#[tracing::instrument(skip_all, fields(layers = plan.layers.len()))]
pub fn execute_plan<B: PassBackend + ?Sized>(
    backend: &mut B,
    plan: &FramePlan,
) -> KloudyResult<FrameRGBA> {
    backend.begin_frame(plan)?;
    if !plan.viewport.is_drawable() {
        return backend.readback_rgba8(plan);
    }

    for layer in &plan.layers {
        if layer.is_empty() {
            continue;
        }
        if let Some(glow) = layer.glow.as_ref().filter(|g| !g.ops.is_empty()) {
            backend.exec_glow(layer, glow, plan)?;
        }
        if !layer.ops.is_empty() {
            backend.exec_layer(layer, plan)?;
        }
    }

    backend.readback_rgba8(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
