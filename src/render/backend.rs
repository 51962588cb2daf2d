use std::path::PathBuf;

use crate::{
    foundation::error::KloudyResult,
    render::{
        passes::{PassBackend, execute_plan},
        plan::FramePlan,
    },
};

/// A rendered frame: premultiplied (when `premultiplied`) RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    /// Pixel at `(x, y)` or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files, on top of system fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Skip system font discovery (text then only resolves against `fonts_dir`).
    pub skip_system_fonts: bool,
}

pub trait RenderBackend: PassBackend {
    fn render_plan(&mut self, plan: &FramePlan) -> KloudyResult<FrameRGBA> {
        execute_plan(self, plan)
    }
}

pub fn create_backend(settings: &RenderSettings) -> Box<dyn RenderBackend> {
    Box::new(crate::render::cpu::CpuBackend::new(settings.clone()))
}
