use rayon::prelude::*;

use crate::foundation::error::{KloudyError, KloudyResult};

/// Separable Gaussian blur over a premultiplied RGBA8 buffer.
///
/// Edges clamp. Weights are Q16 fixed point so a constant image stays exactly constant.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> KloudyResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| KloudyError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(KloudyError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    blur_axis(src, &mut tmp, width, height, true, &kernel);
    blur_axis(&tmp, &mut out, width, height, false, &kernel);
    Ok(out)
}

/// Radius/sigma pair for a canvas `shadowBlur` value (sigma is half the blur).
pub fn shadow_blur_params(blur_px: f64) -> (u32, f32) {
    let sigma = (blur_px / 2.0).max(0.0);
    if sigma < 0.5 {
        return (0, 0.0);
    }
    ((sigma * 3.0).ceil() as u32, sigma as f32)
}

/// Normalized Gaussian taps in Q16; they always sum to exactly `1 << 16`.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> KloudyResult<Vec<u32>> {
    const ONE: i64 = 1 << 16;
    if radius == 0 {
        return Ok(vec![ONE as u32]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(KloudyError::validation("blur sigma must be > 0"));
    }

    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    let r = i64::from(radius);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let total: f64 = raw.iter().sum();

    let mut taps: Vec<i64> = raw
        .iter()
        .map(|w| ((w / total) * ONE as f64).round() as i64)
        .collect();
    // Rounding drift goes to the center tap.
    let drift = ONE - taps.iter().sum::<i64>();
    taps[radius as usize] = (taps[radius as usize] + drift).clamp(0, ONE);
    Ok(taps.into_iter().map(|t| t as u32).collect())
}

/// Convolve one output row along `axis`, reading neighbours from `src` with clamped edges.
fn convolve(src: &[u8], dst_row: &mut [u8], row_start: usize, axis: Axis, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    for (i, out) in dst_row.chunks_exact_mut(4).enumerate() {
        let pixel = row_start + i;
        let along = axis.pos(pixel) as isize;
        let mut acc = [0u64; 4];
        for (tap, &weight) in k.iter().enumerate() {
            let at = (along + tap as isize - radius).clamp(0, axis.len as isize - 1) as usize;
            let base = axis.with_pos(pixel, at) * 4;
            for (a, &v) in acc.iter_mut().zip(&src[base..base + 4]) {
                *a += u64::from(weight) * u64::from(v);
            }
        }
        for (o, a) in out.iter_mut().zip(acc) {
            *o = ((a + (1 << 15)) >> 16).min(255) as u8;
        }
    }
}

#[derive(Clone, Copy)]
struct Axis {
    width: usize,
    len: usize,
    horizontal: bool,
}

impl Axis {
    fn pos(self, pixel: usize) -> usize {
        if self.horizontal {
            pixel % self.width
        } else {
            pixel / self.width
        }
    }

    fn with_pos(self, pixel: usize, at: usize) -> usize {
        if self.horizontal {
            pixel - pixel % self.width + at
        } else {
            at * self.width + pixel % self.width
        }
    }
}

fn blur_axis(src: &[u8], dst: &mut [u8], width: u32, height: u32, horizontal: bool, k: &[u32]) {
    let w = width as usize;
    let axis = Axis {
        width: w,
        len: if horizontal { w } else { height as usize },
        horizontal,
    };
    dst.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| convolve(src, row, y * w, axis, k));
}

/// Bilinear resample of a premultiplied RGBA8 buffer to a new size.
pub fn resample_bilinear(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
) -> KloudyResult<Vec<u8>> {
    if src.len() != src_w as usize * src_h as usize * 4 {
        return Err(KloudyError::render(
            "resample_bilinear expects src matching width*height*4",
        ));
    }
    let mut out = vec![0u8; dst_w as usize * dst_h as usize * 4];
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return Ok(out);
    }

    let sx = f64::from(src_w) / f64::from(dst_w);
    let sy = f64::from(src_h) / f64::from(dst_h);
    let sw = src_w as usize;
    let px = |x: usize, y: usize, c: usize| f64::from(src[(y * sw + x) * 4 + c]);

    out.par_chunks_mut(dst_w as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = ((y as f64 + 0.5) * sy - 0.5).clamp(0.0, f64::from(src_h - 1));
            let y0 = fy.floor() as usize;
            let y1 = (y0 + 1).min(src_h as usize - 1);
            let ty = fy - y0 as f64;
            for x in 0..dst_w as usize {
                let fx = ((x as f64 + 0.5) * sx - 0.5).clamp(0.0, f64::from(src_w - 1));
                let x0 = fx.floor() as usize;
                let x1 = (x0 + 1).min(sw - 1);
                let tx = fx - x0 as f64;
                for c in 0..4 {
                    let top = px(x0, y0, c) * (1.0 - tx) + px(x1, y0, c) * tx;
                    let bottom = px(x0, y1, c) * (1.0 - tx) + px(x1, y1, c) * tx;
                    row[x * 4 + c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
