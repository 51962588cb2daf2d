use crate::foundation::{
    error::{KloudyError, KloudyResult},
    math::mul_div255_u16,
};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> KloudyResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KloudyError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` over `dst` shifted by whole pixels; pixels shifted outside are dropped.
pub fn over_shifted_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    dx: i32,
    dy: i32,
    opacity: f32,
) -> KloudyResult<()> {
    if dst.len() != src.len() || dst.len() != width as usize * height as usize * 4 {
        return Err(KloudyError::render(
            "over_shifted_in_place expects equal-length width*height*4 buffers",
        ));
    }
    if dx == 0 && dy == 0 {
        return over_in_place(dst, src, opacity);
    }

    let (w, h) = (width as i32, height as i32);
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            let out = over(
                [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]],
                [src[si], src[si + 1], src[si + 2], src[si + 3]],
                opacity,
            );
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y).min(255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
