use std::{f64::consts::TAU, path::PathBuf};

use crate::{
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::{
        core::{FrameStep, Point, Viewport},
        error::{KloudyError, KloudyResult},
    },
    page::{Page, PageEvent},
    render::backend::RenderBackend,
};

#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    pub seconds: f64,
    pub fps: u32,
    /// Move a synthetic pointer across the hero so the parallax shows up in the clip.
    pub sweep: bool,
    pub overwrite: bool,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            seconds: 5.0,
            fps: 30,
            sweep: false,
            overwrite: true,
        }
    }
}

impl RenderToMp4Opts {
    pub fn frame_count(&self) -> KloudyResult<u64> {
        if !self.seconds.is_finite() || self.seconds <= 0.0 {
            return Err(KloudyError::validation("render seconds must be > 0"));
        }
        if self.fps == 0 {
            return Err(KloudyError::validation("render fps must be non-zero"));
        }
        Ok(((self.seconds * f64::from(self.fps)).round() as u64).max(1))
    }
}

/// Pointer position for the sweep at progress `t` in `[0, 1]`: one left-to-right pass with a
/// vertical bob.
pub fn sweep_pointer(viewport: Viewport, t: f64) -> Point {
    let c = viewport.center();
    Point::new(
        c.x - c.x * (TAU * t).cos(),
        c.y + c.y * 0.6 * (TAU * 2.0 * t).sin(),
    )
}

/// Render `page` for the requested duration and encode it to `out_path`.
///
/// The frame size comes from the page viewport in device pixels. Returns the number of frames
/// written.
#[tracing::instrument(skip_all, fields(out = %out_path.display()))]
pub fn render_hero_to_mp4(
    page: &mut Page,
    backend: &mut dyn RenderBackend,
    out_path: PathBuf,
    opts: &RenderToMp4Opts,
) -> KloudyResult<u64> {
    let frames = opts.frame_count()?;
    let viewport = page.viewport();
    let (width, height) = viewport.pixel_size();
    let cfg = EncodeConfig {
        overwrite: opts.overwrite,
        ..EncodeConfig::new(out_path, width, height, opts.fps)
    };
    let mut encoder = FfmpegEncoder::new(cfg, page.theme().background)?;

    let step = FrameStep::for_fps(opts.fps);
    for i in 0..frames {
        if opts.sweep {
            let t = i as f64 / frames as f64;
            page.handle_event(PageEvent::PointerMove(sweep_pointer(viewport, t)));
        }
        let frame = page.render(backend)?;
        encoder.encode_frame(&frame)?;
        page.tick(step);
    }
    encoder.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/video.rs"]
mod tests;
