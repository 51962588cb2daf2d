use super::*;

const ALL: [Ease; 3] = [Ease::Linear, Ease::PARALLAX, Ease::MODAL_ENTRY];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn cubic_bezier_linear_controls_is_identity() {
    let linear = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for t in [0.1, 0.3, 0.5, 0.9] {
        assert!((linear.apply(t) - t).abs() < 1e-5);
    }
}

#[test]
fn parallax_curve_front_loads_motion() {
    // The transition is an ease-out: past the halfway mark well before half the time.
    let mid = Ease::PARALLAX.apply(0.5);
    assert!(mid > 0.7, "got {mid}");
    assert!(Ease::PARALLAX.apply(-1.0) == 0.0);
    assert!(Ease::PARALLAX.apply(2.0) == 1.0);
}
