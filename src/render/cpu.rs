use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::{
        core::{Affine, BezPath, Point, Rgba, Rgba8Premul, Vec2},
        error::{KloudyError, KloudyResult},
    },
    render::{
        backend::{FrameRGBA, RenderBackend, RenderSettings},
        blur::{blur_rgba8_premul, resample_bilinear, shadow_blur_params},
        composite::over_in_place,
        passes::PassBackend,
        plan::{DrawOp, FramePlan, GlowPass, LayerPlan, TextRun},
        text::{build_fontdb, rasterize_text_run},
    },
};

const TEXT_CACHE_LIMIT: usize = 64;

/// Glow surfaces are rendered at this fraction of the frame size before blurring.
const GLOW_SCALE: f64 = 0.25;

/// Software backend built on `vello_cpu`.
pub struct CpuBackend {
    settings: RenderSettings,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
    text_cache: HashMap<String, (vello_cpu::Image, f64, f64)>,
    frame: Option<CpuSurface>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuSurface {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        }
    }
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            fontdb: None,
            text_cache: HashMap::new(),
            frame: None,
        }
    }

    fn fontdb(&mut self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                build_fontdb(
                    self.settings.fonts_dir.as_deref(),
                    self.settings.skip_system_fonts,
                )
            })
            .clone()
    }

    fn text_paint_for(
        &mut self,
        run: &TextRun,
        plan: &FramePlan,
    ) -> KloudyResult<(vello_cpu::Image, f64, f64)> {
        let vp = plan.viewport;
        let (pw, ph) = vp.pixel_size();
        let key = format!("{pw}x{ph}:{run:?}");
        if let Some(cached) = self.text_cache.get(&key) {
            return Ok(cached.clone());
        }

        let fontdb = self.fontdb();
        let (w, h, data) =
            rasterize_text_run(run, vp.width, vp.height, vp.device_pixel_ratio, &fontdb)?;
        let pixmap = image_premul_bytes_to_pixmap(&data, w, h)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        if self.text_cache.len() >= TEXT_CACHE_LIMIT {
            self.text_cache.clear();
        }
        let entry = (paint, f64::from(w), f64::from(h));
        self.text_cache.insert(key, entry.clone());
        Ok(entry)
    }

    /// Render `ops` into a fresh transparent `width`×`height` pixmap under `base`.
    fn draw_ops(
        &mut self,
        ops: &[DrawOp],
        base: Affine,
        width: u16,
        height: u16,
        plan: &FramePlan,
    ) -> KloudyResult<vello_cpu::Pixmap> {
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        for op in ops {
            self.draw_op(&mut ctx, op, base, plan)?;
        }
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap)
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        base: Affine,
        plan: &FramePlan,
    ) -> KloudyResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath { path, color } => {
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::StrokePath { path, width, color } => {
                ctx.set_transform(affine_to_cpu(base));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawOp::Text(run) => {
                let (paint, w, h) = self.text_paint_for(run, plan)?;
                // The raster is already in device pixels.
                let device = base * Affine::scale(1.0 / plan.viewport.device_pixel_ratio);
                ctx.set_transform(affine_to_cpu(device));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            }
        }
        Ok(())
    }

    fn frame_mut(&mut self) -> KloudyResult<&mut CpuSurface> {
        self.frame
            .as_mut()
            .ok_or_else(|| KloudyError::render("frame surface was not initialized"))
    }

    fn frame_size(&self) -> KloudyResult<(u16, u16)> {
        self.frame
            .as_ref()
            .map(|s| (s.width, s.height))
            .ok_or_else(|| KloudyError::render("frame surface was not initialized"))
    }
}

impl PassBackend for CpuBackend {
    fn begin_frame(&mut self, plan: &FramePlan) -> KloudyResult<()> {
        let (w, h) = plan.viewport.pixel_size();
        let width: u16 = w
            .try_into()
            .map_err(|_| KloudyError::render("frame width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| KloudyError::render("frame height exceeds u16"))?;

        let reuse = matches!(&self.frame, Some(s) if s.width == width && s.height == height);
        if !reuse {
            self.frame = Some(CpuSurface::new(width, height));
        }

        let clear = Rgba8Premul::from(plan.clear.opaque()).to_array();
        clear_pixmap(&mut self.frame_mut()?.pixmap, clear);
        Ok(())
    }

    fn exec_glow(
        &mut self,
        layer: &LayerPlan,
        glow: &GlowPass,
        plan: &FramePlan,
    ) -> KloudyResult<()> {
        let (fw, fh) = self.frame_size()?;
        let gw = ((f64::from(fw) * GLOW_SCALE).ceil() as u16).max(1);
        let gh = ((f64::from(fh) * GLOW_SCALE).ceil() as u16).max(1);
        let sx = f64::from(gw) / f64::from(fw);
        let sy = f64::from(gh) / f64::from(fh);

        let base = Affine::scale_non_uniform(sx, sy)
            * layer_transform(layer.offset + glow.offset, plan.viewport.device_pixel_ratio);
        let small = self.draw_ops(&glow.ops, base, gw, gh, plan)?;

        let (radius, sigma) =
            shadow_blur_params(glow.blur_px * plan.viewport.device_pixel_ratio * sx);
        let blurred = blur_rgba8_premul(
            small.data_as_u8_slice(),
            u32::from(gw),
            u32::from(gh),
            radius,
            sigma,
        )?;
        let full = resample_bilinear(
            &blurred,
            u32::from(gw),
            u32::from(gh),
            u32::from(fw),
            u32::from(fh),
        )?;

        let frame = self.frame_mut()?;
        for _ in 0..glow.repeats.max(1) {
            over_in_place(frame.pixmap.data_as_u8_slice_mut(), &full, glow.opacity)?;
        }
        Ok(())
    }

    fn exec_layer(&mut self, layer: &LayerPlan, plan: &FramePlan) -> KloudyResult<()> {
        let (fw, fh) = self.frame_size()?;
        let base = layer_transform(layer.offset, plan.viewport.device_pixel_ratio);
        let surface = self.draw_ops(&layer.ops, base, fw, fh, plan)?;
        let frame = self.frame_mut()?;
        over_in_place(
            frame.pixmap.data_as_u8_slice_mut(),
            surface.data_as_u8_slice(),
            1.0,
        )
    }

    fn readback_rgba8(&mut self, plan: &FramePlan) -> KloudyResult<FrameRGBA> {
        let (width, height) = plan.viewport.pixel_size();
        let s = self.frame_mut()?;
        Ok(FrameRGBA {
            width,
            height,
            data: s.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl RenderBackend for CpuBackend {}

/// CSS-pixel drawing space shifted by `offset` and scaled to device pixels.
fn layer_transform(offset: Vec2, device_pixel_ratio: f64) -> Affine {
    Affine::translate(offset * device_pixel_ratio) * Affine::scale(device_pixel_ratio)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn color_to_cpu(c: Rgba) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> KloudyResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KloudyError::render("text raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KloudyError::render("text raster height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(KloudyError::render("text raster byte length mismatch"));
    }

    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
