use super::*;

fn viewport() -> Viewport {
    Viewport::new(1000.0, 600.0, 1.0).unwrap()
}

fn settle(mut p: Parallax) -> Parallax {
    for _ in 0..30 {
        p = p.advance(FrameStep::ONE);
    }
    p
}

#[test]
fn pointer_at_center_targets_zero() {
    let mut p = Parallax::new(ParallaxConfig::pointer(0.5));
    p.on_pointer_move(Point::new(500.0, 300.0), viewport());
    assert_eq!(p.target(), Vec2::ZERO);
    assert_eq!(settle(p).offset(), Vec2::ZERO);
}

#[test]
fn pointer_at_edges_targets_full_shift() {
    let mut p = Parallax::new(ParallaxConfig::pointer(0.5));
    p.on_pointer_move(Point::new(1000.0, 600.0), viewport());
    assert_eq!(p.target(), Vec2::new(10.0, 7.5));

    let settled = settle(p);
    assert_eq!(settled.offset(), Vec2::new(10.0, 7.5));

    let mut q = Parallax::new(ParallaxConfig::pointer(1.0));
    q.on_pointer_move(Point::new(0.0, 0.0), viewport());
    assert_eq!(q.target(), Vec2::new(-20.0, -15.0));
}

#[test]
fn transition_eases_over_three_tenths_of_a_second() {
    let mut p = Parallax::new(ParallaxConfig::pointer(1.0));
    p.on_pointer_move(Point::new(1000.0, 300.0), viewport());
    let p = p.advance(FrameStep::new(9.0)); // 0.15 s
    assert!(p.offset().x > 10.0, "ease-out is past halfway at mid time");
    assert!(p.offset().x < 20.0);
    let p = p.advance(FrameStep::new(9.0));
    assert_eq!(p.offset(), Vec2::new(20.0, 0.0));
}

#[test]
fn retarget_restarts_from_displayed_offset() {
    let mut p = Parallax::new(ParallaxConfig::pointer(1.0));
    p.on_pointer_move(Point::new(1000.0, 300.0), viewport());
    let mut p = p.advance(FrameStep::new(6.0));
    let shown = p.offset();
    p.on_pointer_move(Point::new(0.0, 300.0), viewport());
    assert_eq!(p.offset(), shown);
    let p = p.advance(FrameStep::new(1.0));
    assert!(p.offset().x < shown.x);
}

#[test]
fn pointer_mode_ignores_tilt_and_touch() {
    let mut p = Parallax::new(ParallaxConfig::pointer(1.0));
    assert!(!p.on_touch_start());
    p.on_orientation(75.0, 30.0);
    assert_eq!(p.offset(), Vec2::ZERO);
}

#[test]
fn permission_flow_gates_orientation() {
    let mut p = Parallax::new(ParallaxConfig::touch(0.5, true));
    assert_eq!(p.permission(), Permission::Unrequested);

    p.on_orientation(75.0, 30.0);
    assert_eq!(p.offset(), Vec2::ZERO);

    assert!(p.on_touch_start());
    assert_eq!(p.permission(), Permission::Requesting);
    assert!(!p.on_touch_start(), "only one request is issued");

    p.resolve_permission(true);
    assert_eq!(p.permission(), Permission::Granted);

    // Full right tilt, forward by 30 from rest; touch intensity is 1.0.
    p.on_orientation(75.0, 30.0);
    let o = p.offset();
    assert!((o.x - 20.0 * 0.15).abs() < 1e-12);
    assert!((o.y - 15.0 * 0.15).abs() < 1e-12);
}

#[test]
fn denial_keeps_offset() {
    let mut p = Parallax::new(ParallaxConfig::touch(0.5, true));
    assert!(p.on_touch_start());
    p.resolve_permission(false);
    assert_eq!(p.permission(), Permission::Denied);
    p.on_orientation(10.0, -25.0);
    assert_eq!(p.offset(), Vec2::ZERO);
    assert!(!p.on_touch_start());
}

#[test]
fn no_consent_platform_is_granted_up_front() {
    let mut p = Parallax::new(ParallaxConfig::touch(0.5, false));
    assert_eq!(p.permission(), Permission::Granted);
    assert!(!p.on_touch_start());
    p.on_orientation(45.0, 0.0);
    assert_eq!(p.offset(), Vec2::ZERO);
}

#[test]
fn tilt_is_clamped_and_smoothing_converges() {
    let mut p = Parallax::new(ParallaxConfig::touch(1.0, false));
    for _ in 0..200 {
        p.on_orientation(180.0, -90.0);
    }
    let o = p.offset();
    assert!((o.x + 40.0).abs() < 1e-6);
    assert!((o.y - 30.0).abs() < 1e-6);
}
