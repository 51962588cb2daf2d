use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    foundation::error::{KloudyError, KloudyResult},
    render::plan::{TextAlign, TextRun},
};

/// System fonts plus any font files found directly in `extra_dir`.
pub fn build_fontdb(extra_dir: Option<&Path>, skip_system: bool) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if !skip_system {
        db.load_system_fonts();
    }
    if let Some(dir) = extra_dir {
        load_fonts_from_dir(&mut db, dir);
    }
    if db.is_empty() {
        tracing::warn!("no fonts available; text runs will render empty");
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "fonts directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

/// Standalone SVG document for a single text run on a `width`×`height` CSS-pixel canvas.
pub fn text_run_svg(run: &TextRun, width: f64, height: f64) -> String {
    let anchor = match run.align {
        TextAlign::Start => "start",
        TextAlign::Center => "middle",
    };
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" font-weight="{weight}" "#,
            r#"letter-spacing="{spacing}" text-anchor="{anchor}" fill="{fill}" fill-opacity="{alpha}">{text}{cursor}</text>"#,
            "</svg>"
        ),
        w = width,
        h = height,
        x = run.origin.x,
        y = run.origin.y,
        family = run.family.css_stack(),
        size = run.size_px,
        weight = run.weight,
        spacing = run.letter_spacing_em * run.size_px,
        anchor = anchor,
        fill = run.color.rgb.to_hex(),
        alpha = run.color.a,
        text = escape_xml(&run.text),
        cursor = cursor_tspan(run.cursor),
    )
}

fn cursor_tspan(cursor: Option<bool>) -> &'static str {
    match cursor {
        None => "",
        Some(true) => "<tspan>_</tspan>",
        Some(false) => r#"<tspan fill-opacity="0">_</tspan>"#,
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Rasterize a text run into a premultiplied RGBA8 buffer covering the whole layer.
pub fn rasterize_text_run(
    run: &TextRun,
    css_width: f64,
    css_height: f64,
    device_pixel_ratio: f64,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> KloudyResult<(u32, u32, Vec<u8>)> {
    let svg = text_run_svg(run, css_width, css_height);
    let opts = usvg::Options {
        fontdb: fontdb.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts).context("parse text svg")?;

    let width = (css_width * device_pixel_ratio).round().max(1.0) as u32;
    let height = (css_height * device_pixel_ratio).round().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| KloudyError::render("failed to allocate text pixmap"))?;

    let scale = device_pixel_ratio as f32;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok((width, height, pixmap.data().to_vec()))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
