use std::f64::consts::TAU;

use kurbo::Shape as _;

use crate::{
    animation::ease::Ease,
    contact::form::{ContactForm, SubmitStatus, SubmitStep},
    foundation::core::{Affine, BezPath, FrameStep, Point, Rect, Rgb, Rgba, Vec2, Viewport},
    render::plan::{DrawOp, FontFamily, GlowPass, LayerPlan, TextAlign, TextRun},
    scene::{hero::cursor_visible, uniform},
    theme::Theme,
};

pub const OVERLAY_Z: i32 = 50;

pub const TITLE: &str = "Let's Connect";
pub const BUTTON_IDLE: &str = "send_message()";
pub const BUTTON_BUSY: &str = "sending...";
pub const MESSAGE_PLACEHOLDER: &str = "Tell us what's on your mind?";

const BACKDROP_ALPHA: f32 = 0.95;
const PARTICLE_COUNT: usize = 20;
const ENTRY_SECS: f64 = 0.4;
const SCANLINE_SECS: f64 = 2.0;
const SCANLINE_STRIPS: usize = 12;

const CARD_MAX_WIDTH: f64 = 448.0;
const CARD_MARGIN: f64 = 16.0;
const CARD_PADDING: f64 = 32.0;
const CARD_RADIUS: f64 = 8.0;
const CORNER: f64 = 16.0;

const TITLE_LINE: f64 = 32.0;
const TITLE_GAP: f64 = 24.0;
const LABEL_LINE: f64 = 20.0;
const LABEL_GAP: f64 = 4.0;
const INPUT_HEIGHT: f64 = 38.0;
const TEXTAREA_HEIGHT: f64 = 98.0;
const FIELD_ERROR_LINE: f64 = 20.0;
const STATUS_LINE: f64 = 20.0;
const ROW_GAP: f64 = 16.0;
const BUTTON_HEIGHT: f64 = 44.0;
const SUCCESS_PANEL: f64 = 144.0;

const ERROR_RED: Rgb = Rgb::new(0xef, 0x44, 0x44);

/// Card and control rectangles in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    pub card: Rect,
    pub close_button: Rect,
    pub email_field: Rect,
    pub message_field: Rect,
    pub submit_button: Rect,
}

/// Compute the card layout for the current form contents (errors grow the card).
pub fn layout(viewport: Viewport, form: &ContactForm) -> OverlayLayout {
    let width = CARD_MAX_WIDTH.min(viewport.width - 2.0 * CARD_MARGIN).max(0.0);
    let errors = form.errors();

    let mut body = LABEL_LINE + LABEL_GAP + INPUT_HEIGHT;
    if errors.email.is_some() {
        body += FIELD_ERROR_LINE;
    }
    body += ROW_GAP + LABEL_LINE + LABEL_GAP + TEXTAREA_HEIGHT;
    if errors.message.is_some() {
        body += FIELD_ERROR_LINE;
    }
    if form.status() == SubmitStatus::Error {
        body += ROW_GAP + STATUS_LINE;
    }
    body += ROW_GAP + BUTTON_HEIGHT;
    if form.status() == SubmitStatus::Success {
        body = SUCCESS_PANEL;
    }

    let height = 2.0 * CARD_PADDING + TITLE_LINE + TITLE_GAP + body;
    let c = viewport.center();
    let card = Rect::from_center_size(c, (width, height));

    let inner_x0 = card.x0 + CARD_PADDING;
    let inner_x1 = card.x1 - CARD_PADDING;
    let mut y = card.y0 + CARD_PADDING + TITLE_LINE + TITLE_GAP + LABEL_LINE + LABEL_GAP;
    let email_field = Rect::new(inner_x0, y, inner_x1, y + INPUT_HEIGHT);
    y = email_field.y1 + errors.email.map_or(0.0, |_| FIELD_ERROR_LINE);
    y += ROW_GAP + LABEL_LINE + LABEL_GAP;
    let message_field = Rect::new(inner_x0, y, inner_x1, y + TEXTAREA_HEIGHT);
    let button_y = card.y1 - CARD_PADDING - BUTTON_HEIGHT;
    let submit_button = Rect::new(inner_x0, button_y, inner_x1, card.y1 - CARD_PADDING);

    OverlayLayout {
        card,
        close_button: Rect::new(card.x1 - 40.0, card.y0 + 16.0, card.x1 - 16.0, card.y0 + 40.0),
        email_field,
        message_field,
        submit_button,
    }
}

/// Where a click on the open overlay landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayHit {
    Outside,
    CloseButton,
    SubmitButton,
    Card,
}

/// The contact modal: a [`ContactForm`] plus the purely visual state around it.
#[derive(Clone, Debug)]
pub struct ContactOverlay {
    form: ContactForm,
    entry_secs: f64,
    clock_secs: f64,
    /// Decorative dots as viewport fractions, with a pulse delay in seconds.
    particles: Vec<(Point, f64)>,
}

impl ContactOverlay {
    pub fn new(form: ContactForm) -> Self {
        Self {
            form,
            entry_secs: 0.0,
            clock_secs: 0.0,
            particles: Vec::new(),
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn is_open(&self) -> bool {
        self.form.is_open()
    }

    pub fn open(&mut self, rng: &mut fastrand::Rng) {
        self.form.open();
        self.entry_secs = 0.0;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| {
                (
                    Point::new(rng.f64(), rng.f64()),
                    uniform(rng, 0.0, 0.5),
                )
            })
            .collect();
    }

    pub fn close(&mut self) {
        self.form.close();
    }

    pub fn hit(&self, p: Point, viewport: Viewport) -> OverlayHit {
        let l = layout(viewport, &self.form);
        if !l.card.contains(p) {
            OverlayHit::Outside
        } else if l.close_button.contains(p) {
            OverlayHit::CloseButton
        } else if self.form.status() != SubmitStatus::Success && l.submit_button.contains(p) {
            OverlayHit::SubmitButton
        } else {
            OverlayHit::Card
        }
    }

    /// Handle a click while open. Returns the submit step when the button was pressed.
    pub fn click(&mut self, p: Point, viewport: Viewport) -> Option<SubmitStep> {
        match self.hit(p, viewport) {
            OverlayHit::Outside | OverlayHit::CloseButton => {
                self.close();
                None
            }
            OverlayHit::SubmitButton => Some(self.form.begin_submit()),
            OverlayHit::Card => None,
        }
    }

    pub fn advance(&mut self, step: FrameStep) {
        self.form.advance(step);
        if self.form.is_open() {
            self.entry_secs += step.as_secs();
            self.clock_secs += step.as_secs();
        }
    }

    /// Entry progress in `[0, 1]`, eased.
    pub fn entry_progress(&self) -> f64 {
        Ease::MODAL_ENTRY.apply(self.entry_secs / ENTRY_SECS)
    }

    /// Backdrop layer and card layer; empty when closed.
    pub fn plan(&self, viewport: Viewport, theme: &Theme) -> Vec<LayerPlan> {
        if !self.is_open() || !viewport.is_drawable() {
            return Vec::new();
        }
        vec![
            self.backdrop_plan(viewport, theme),
            self.card_plan(viewport, theme),
        ]
    }

    fn backdrop_plan(&self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let mut layer = LayerPlan::new("contact-backdrop", OVERLAY_Z);
        let (w, h) = (viewport.width, viewport.height);
        layer.ops.push(DrawOp::rect(
            Rect::new(0.0, 0.0, w, h),
            theme.background.with_alpha(BACKDROP_ALPHA),
        ));

        for (at, delay) in &self.particles {
            let t = (self.clock_secs - delay).max(0.0);
            // Tailwind's pulse: full opacity at the ends of a 2 s cycle, half in the middle.
            let pulse = 0.75 + 0.25 * (TAU * t / 2.0).cos();
            layer.ops.push(DrawOp::circle(
                Point::new(at.x * w, at.y * h),
                2.0,
                theme.grid.with_alpha((0.3 * pulse) as f32),
            ));
        }

        // A full-height gradient band sweeping down the screen.
        let sweep = (self.clock_secs / SCANLINE_SECS).fract();
        let top = -h + sweep * 2.0 * h;
        let strip = h / SCANLINE_STRIPS as f64;
        for k in 0..SCANLINE_STRIPS {
            let y0 = top + k as f64 * strip;
            let mid = (k as f64 + 0.5) / SCANLINE_STRIPS as f64;
            let alpha = (8.0 / 255.0) * (1.0 - (mid - 0.5).abs() * 2.0);
            layer.ops.push(DrawOp::rect(
                Rect::new(0.0, y0, w, y0 + strip),
                theme.grid.with_alpha(alpha as f32),
            ));
        }
        layer
    }

    fn card_plan(&self, viewport: Viewport, theme: &Theme) -> LayerPlan {
        let l = layout(viewport, &self.form);
        let e = self.entry_progress();
        let scale = 0.9 + 0.1 * e;
        let center = l.card.center();
        let entry = Affine::translate(Vec2::new(0.0, 20.0 * (1.0 - e)))
            * Affine::translate(center.to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-center.to_vec2());
        let alpha = e as f32;

        let palette = CardPalette::for_theme(theme);
        let mut ops = Vec::new();
        let card_path = kurbo::RoundedRect::from_rect(l.card, CARD_RADIUS).to_path(0.1);
        ops.push(DrawOp::FillPath {
            path: card_path.clone(),
            color: palette.card,
        });
        ops.push(DrawOp::StrokePath {
            path: card_path.clone(),
            width: 1.0,
            color: palette.border.opaque(),
        });
        push_corner_accents(&mut ops, l.card, theme.grid);
        push_close_icon(&mut ops, l.close_button, theme.text_muted);

        let x0 = l.card.x0 + CARD_PADDING;
        ops.push(DrawOp::Text(TextRun {
            text: TITLE.to_string(),
            family: FontFamily::Sans,
            size_px: 24.0,
            weight: 500,
            letter_spacing_em: 0.0,
            align: TextAlign::Start,
            origin: Point::new(x0, l.card.y0 + CARD_PADDING + 24.0),
            color: theme.text.opaque(),
            cursor: Some(cursor_visible(self.clock_secs)),
        }));

        if self.form.status() == SubmitStatus::Success {
            let cx = l.card.center().x;
            let top = l.card.y0 + CARD_PADDING + TITLE_LINE + TITLE_GAP + 32.0;
            ops.push(DrawOp::Text(mono("\u{2713}", 36.0, Point::new(cx, top + 32.0), theme.text.opaque(), TextAlign::Center)));
            ops.push(DrawOp::Text(mono(
                crate::contact::form::SUBMIT_SUCCEEDED,
                16.0,
                Point::new(cx, top + 40.0 + 16.0 + 18.0),
                theme.text.opaque(),
                TextAlign::Center,
            )));
        } else {
            self.push_form_ops(&mut ops, &l, theme, &palette);
        }

        let mut layer = LayerPlan::new("contact-card", OVERLAY_Z + 1);
        layer.glow = Some(GlowPass {
            ops: vec![DrawOp::FillPath {
                path: card_path,
                color: theme.grid.with_alpha(0x20 as f32 / 255.0),
            }],
            blur_px: 60.0,
            offset: Vec2::ZERO,
            opacity: alpha,
            repeats: 1,
        });
        layer.ops = ops
            .into_iter()
            .map(|op| transform_op(op, entry, scale, alpha))
            .collect();
        if let Some(glow) = layer.glow.as_mut() {
            glow.ops = std::mem::take(&mut glow.ops)
                .into_iter()
                .map(|op| transform_op(op, entry, scale, 1.0))
                .collect();
        }
        layer
    }

    fn push_form_ops(
        &self,
        ops: &mut Vec<DrawOp>,
        l: &OverlayLayout,
        theme: &Theme,
        palette: &CardPalette,
    ) {
        let form = &self.form;
        let errors = form.errors();
        let x0 = l.email_field.x0;

        let field = |ops: &mut Vec<DrawOp>, label: &str, rect: Rect, value: &str, error: Option<&str>| {
            ops.push(DrawOp::Text(mono(
                label,
                14.0,
                Point::new(x0, rect.y0 - LABEL_GAP - 5.0),
                theme.text_muted,
                TextAlign::Start,
            )));
            let border = if error.is_some() {
                ERROR_RED
            } else if !value.is_empty() {
                theme.grid
            } else {
                palette.border
            };
            let path = kurbo::RoundedRect::from_rect(rect, 4.0).to_path(0.1);
            ops.push(DrawOp::FillPath {
                path: path.clone(),
                color: palette.input.opaque(),
            });
            ops.push(DrawOp::StrokePath {
                path,
                width: 1.0,
                color: border.opaque(),
            });
            if let Some(msg) = error {
                ops.push(DrawOp::Text(mono(
                    msg,
                    12.0,
                    Point::new(x0, rect.y1 + 16.0),
                    ERROR_RED.opaque(),
                    TextAlign::Start,
                )));
            }
        };

        field(ops, "email", l.email_field, form.email(), errors.email);
        if !form.email().is_empty() {
            ops.push(DrawOp::Text(mono(
                &fit_line(form.email(), l.email_field.width() - 24.0, 14.0),
                14.0,
                Point::new(x0 + 12.0, l.email_field.y0 + 24.0),
                theme.text.opaque(),
                TextAlign::Start,
            )));
        }

        field(ops, "message", l.message_field, form.message(), errors.message);
        let (text, color) = if form.message().is_empty() {
            (MESSAGE_PLACEHOLDER, theme.text.with_alpha(0.4))
        } else {
            (form.message(), theme.text.opaque())
        };
        ops.push(DrawOp::Text(mono(
            &fit_line(text, l.message_field.width() - 24.0, 14.0),
            14.0,
            Point::new(x0 + 12.0, l.message_field.y0 + 24.0),
            color,
            TextAlign::Start,
        )));

        if form.status() == SubmitStatus::Error
            && let Some(msg) = form.status_message()
        {
            ops.push(DrawOp::Text(mono(
                msg,
                14.0,
                Point::new(x0, l.submit_button.y0 - ROW_GAP - 5.0),
                ERROR_RED.opaque(),
                TextAlign::Start,
            )));
        }

        let busy = form.status() == SubmitStatus::Submitting;
        let button_alpha = if busy { 0.5 } else { 1.0 };
        ops.push(DrawOp::FillPath {
            path: kurbo::RoundedRect::from_rect(l.submit_button, 4.0).to_path(0.1),
            color: theme.grid.with_alpha(button_alpha),
        });
        ops.push(DrawOp::Text(mono(
            if busy { BUTTON_BUSY } else { BUTTON_IDLE },
            14.0,
            Point::new(l.submit_button.center().x, l.submit_button.y0 + 27.0),
            theme.on_grid_rgb().with_alpha(button_alpha),
            TextAlign::Center,
        )));
    }
}

struct CardPalette {
    card: Rgba,
    border: Rgb,
    input: Rgb,
}

impl CardPalette {
    fn for_theme(theme: &Theme) -> Self {
        if theme.is_dark() {
            Self {
                card: Rgb::new(0x11, 0x18, 0x27).with_alpha(0.9),
                border: Rgb::new(0x37, 0x41, 0x51),
                input: Rgb::new(0x1f, 0x29, 0x37),
            }
        } else {
            Self {
                card: Rgb::new(0xf3, 0xf4, 0xf6).with_alpha(0.9),
                border: Rgb::new(0xd1, 0xd5, 0xdb),
                input: Rgb::WHITE,
            }
        }
    }
}

fn mono(text: &str, size: f64, origin: Point, color: Rgba, align: TextAlign) -> TextRun {
    TextRun {
        text: text.to_string(),
        family: FontFamily::Mono,
        size_px: size,
        weight: 400,
        letter_spacing_em: 0.0,
        align,
        origin,
        color,
        cursor: None,
    }
}

/// First line of `text`, cut with an ellipsis to roughly fit `width` in a monospace face.
fn fit_line(text: &str, width: f64, size: f64) -> String {
    let line = text.lines().next().unwrap_or("");
    let max = ((width / (size * 0.6)).floor() as usize).max(1);
    if line.chars().count() <= max {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

fn push_corner_accents(ops: &mut Vec<DrawOp>, card: Rect, rgb: Rgb) {
    let corners = [
        (Point::new(card.x0, card.y0), 1.0, 1.0),
        (Point::new(card.x1, card.y0), -1.0, 1.0),
        (Point::new(card.x0, card.y1), 1.0, -1.0),
        (Point::new(card.x1, card.y1), -1.0, -1.0),
    ];
    for (p, sx, sy) in corners {
        let mut path = BezPath::new();
        path.move_to(Point::new(p.x + sx * CORNER, p.y + sy));
        path.line_to(Point::new(p.x + sx, p.y + sy));
        path.line_to(Point::new(p.x + sx, p.y + sy * CORNER));
        ops.push(DrawOp::StrokePath {
            path,
            width: 2.0,
            color: rgb.opaque(),
        });
    }
}

fn push_close_icon(ops: &mut Vec<DrawOp>, button: Rect, color: Rgba) {
    let r = button.inset(-6.0);
    for (a, b) in [
        (Point::new(r.x0, r.y1), Point::new(r.x1, r.y0)),
        (Point::new(r.x0, r.y0), Point::new(r.x1, r.y1)),
    ] {
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        ops.push(DrawOp::StrokePath {
            path,
            width: 2.0,
            color,
        });
    }
}

fn transform_op(op: DrawOp, affine: Affine, scale: f64, alpha: f32) -> DrawOp {
    match op {
        DrawOp::FillPath { mut path, color } => {
            path.apply_affine(affine);
            DrawOp::FillPath {
                path,
                color: color.scale_alpha(alpha),
            }
        }
        DrawOp::StrokePath {
            mut path,
            width,
            color,
        } => {
            path.apply_affine(affine);
            DrawOp::StrokePath {
                path,
                width: width * scale,
                color: color.scale_alpha(alpha),
            }
        }
        DrawOp::Text(mut run) => {
            run.origin = affine * run.origin;
            run.size_px *= scale;
            run.color = run.color.scale_alpha(alpha);
            DrawOp::Text(run)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/contact/overlay.rs"]
mod tests;
