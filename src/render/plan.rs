use crate::foundation::core::{BezPath, Point, Rgb, Rgba, Vec2, Viewport};

/// Backend-agnostic description of one frame.
///
/// Layers are kept sorted by `z` (stable for equal z), and each one is rendered into its own
/// surface before being composited over the frame in that order.
#[derive(Clone, Debug)]
pub struct FramePlan {
    pub viewport: Viewport,
    pub clear: Rgb,
    pub layers: Vec<LayerPlan>,
}

impl FramePlan {
    pub fn new(viewport: Viewport, clear: Rgb) -> Self {
        Self {
            viewport,
            clear,
            layers: Vec::new(),
        }
    }

    pub fn push_layer(&mut self, layer: LayerPlan) {
        let at = self.layers.partition_point(|l| l.z <= layer.z);
        self.layers.insert(at, layer);
    }

    pub fn layer(&self, name: &str) -> Option<&LayerPlan> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn op_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.ops.len() + l.glow.as_ref().map_or(0, |g| g.ops.len()))
            .sum()
    }
}

/// Draw list for one layer's private surface. Coordinates are CSS pixels.
#[derive(Clone, Debug)]
pub struct LayerPlan {
    pub name: &'static str,
    pub z: i32,
    /// Translation applied to the whole layer (parallax).
    pub offset: Vec2,
    pub ops: Vec<DrawOp>,
    /// Blurred shadow drawn beneath `ops`.
    pub glow: Option<GlowPass>,
}

impl LayerPlan {
    pub fn new(name: &'static str, z: i32) -> Self {
        Self {
            name,
            z,
            offset: Vec2::ZERO,
            ops: Vec::new(),
            glow: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.glow.as_ref().is_none_or(|g| g.ops.is_empty())
    }
}

/// Canvas-style shadow: `ops` are drawn offscreen, blurred and composited at `offset`.
#[derive(Clone, Debug)]
pub struct GlowPass {
    pub ops: Vec<DrawOp>,
    /// Canvas `shadowBlur` in CSS pixels; the Gaussian sigma is half of it.
    pub blur_px: f64,
    pub offset: Vec2,
    pub opacity: f32,
    /// How many times the blurred shadow is laid down (one per stroke call).
    pub repeats: u8,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    FillPath {
        path: BezPath,
        color: Rgba,
    },
    StrokePath {
        path: BezPath,
        width: f64,
        color: Rgba,
    },
    Text(TextRun),
}

impl DrawOp {
    pub fn circle(center: Point, radius: f64, color: Rgba) -> Self {
        use kurbo::Shape as _;
        Self::FillPath {
            path: kurbo::Circle::new(center, radius.max(0.0)).to_path(0.05),
            color,
        }
    }

    pub fn rect(rect: kurbo::Rect, color: Rgba) -> Self {
        use kurbo::Shape as _;
        Self::FillPath {
            path: rect.to_path(0.1),
            color,
        }
    }

    pub fn quad_stroke(p0: Point, ctrl: Point, p2: Point, width: f64, color: Rgba) -> Self {
        let mut path = BezPath::new();
        path.move_to(p0);
        path.quad_to(ctrl, p2);
        Self::StrokePath { path, width, color }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Self::FillPath { color, .. } | Self::StrokePath { color, .. } => *color,
            Self::Text(run) => run.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Sans,
    Mono,
}

impl FontFamily {
    pub fn css_stack(self) -> &'static str {
        match self {
            Self::Sans => "Geist, Inter, Helvetica, Arial, sans-serif",
            Self::Mono => "'JetBrains Mono', 'DejaVu Sans Mono', Menlo, monospace",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAlign {
    Start,
    Center,
}

/// A single line of text. `origin` is the baseline point the alignment refers to.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub family: FontFamily,
    pub size_px: f64,
    pub weight: u16,
    pub letter_spacing_em: f64,
    pub align: TextAlign,
    pub origin: Point,
    pub color: Rgba,
    /// Trailing `_` cursor: `Some(visible)` appends it, fully transparent while hidden so the
    /// rest of the line keeps its position.
    pub cursor: Option<bool>,
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
