use crate::foundation::core::Point;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Point on the quadratic Bézier `p0 -> (p1) -> p2` at parameter `t`.
pub fn quad_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let c = t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x,
        a * p0.y + b * p1.y + c * p2.y,
    )
}

/// Lift of a symmetric arc whose control point sits `lift` above both endpoints.
///
/// `2t(1-t)` peaks at `0.5` at the midpoint, so the curve itself rises by `lift / 2` there.
pub fn arc_lift_at(t: f64, lift: f64) -> f64 {
    lift * 2.0 * t * (1.0 - t)
}

/// Probability that an event with `per_frame` chance fires at least once over `frames`.
pub fn chance_over(per_frame: f64, frames: f64) -> f64 {
    let p = per_frame.clamp(0.0, 1.0);
    if frames <= 0.0 {
        return 0.0;
    }
    1.0 - (1.0 - p).powf(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
