#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)` timing function.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Ease {
    /// `cubic-bezier(0.25, 0.46, 0.45, 0.94)`, the parallax transform transition.
    pub const PARALLAX: Self = Self::CubicBezier {
        x1: 0.25,
        y1: 0.46,
        x2: 0.45,
        y2: 0.94,
    };

    /// `cubic-bezier(0.16, 1, 0.3, 1)`, the contact card entry.
    pub const MODAL_ENTRY: Self = Self::CubicBezier {
        x1: 0.16,
        y1: 1.0,
        x2: 0.3,
        y2: 1.0,
    };

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_x(t, x1.clamp(0.0, 1.0), x2.clamp(0.0, 1.0));
                bezier_1d(s, y1, y2)
            }
        }
    }
}

// Endpoints are fixed at 0 and 1, so each axis is a 1D cubic in the two control values.
fn bezier_1d(s: f64, c1: f64, c2: f64) -> f64 {
    let ms = 1.0 - s;
    3.0 * ms * ms * s * c1 + 3.0 * ms * s * s * c2 + s * s * s
}

fn bezier_1d_slope(s: f64, c1: f64, c2: f64) -> f64 {
    let ms = 1.0 - s;
    3.0 * ms * ms * c1 + 6.0 * ms * s * (c2 - c1) + 3.0 * s * s * (1.0 - c2)
}

fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_1d(s, x1, x2) - x;
        if err.abs() < 1e-7 {
            return s;
        }
        let d = bezier_1d_slope(s, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
    }

    // Newton stalled on a flat segment; x(s) is monotonic for x1, x2 in [0, 1].
    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..64 {
        let v = bezier_1d(s, x1, x2);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
