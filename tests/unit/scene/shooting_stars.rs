use super::*;

fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0, 1.0).unwrap()
}

#[test]
fn trail_capacity_is_half_the_length() {
    assert_eq!(
        ShootingStar::new(Point::ZERO, 41.0, 6.0, 0.5, FRAC_PI_4)
            .trail()
            .capacity(),
        20
    );
    assert_eq!(
        ShootingStar::new(Point::ZERO, 119.9, 6.0, 0.5, FRAC_PI_4)
            .trail()
            .capacity(),
        59
    );
    assert_eq!(
        ShootingStar::new(Point::ZERO, 1.0, 6.0, 0.5, FRAC_PI_4)
            .trail()
            .capacity(),
        1
    );
}

#[test]
fn trail_never_exceeds_half_length() {
    let mut star = ShootingStar::new(Point::new(10.0, 10.0), 50.0, 1.0, 0.4, FRAC_PI_4);
    for _ in 0..200 {
        star = star.advance(FrameStep::ONE, viewport());
        assert!(star.trail().len() as f64 <= (star.length / 2.0).ceil());
    }
    assert_eq!(star.trail().len(), 25);
    assert_eq!(star.trail().newest().map(|s| s.position), Some(star.head));
}

#[test]
fn advance_moves_along_angle() {
    let star = ShootingStar::new(Point::new(0.0, 0.0), 60.0, 10.0, 0.4, 0.0);
    let star = star.advance(FrameStep::ONE, viewport());
    assert!((star.head.x - 10.0).abs() < 1e-9);
    assert!(star.head.y.abs() < 1e-9);
    assert!(star.active);
}

#[test]
fn retired_past_margin_and_dropped_next_pass() {
    let vp = viewport();
    let star = ShootingStar::new(Point::new(1095.0, 10.0), 60.0, 10.0, 0.4, 0.0);
    let sky = ShootingStars::new(0.0).with_streak(star);

    let mut rng = fastrand::Rng::with_seed(1);
    let sky = sky.advance(FrameStep::ONE, vp, &mut rng);
    assert_eq!(sky.streaks().len(), 1);
    assert!(!sky.streaks()[0].active, "x = 1105 is beyond width + 100");
    // Still drawn on the pass it left the screen.
    assert!(!sky.plan(vp, &Theme::default()).is_empty());

    let sky = sky.advance(FrameStep::ONE, vp, &mut rng);
    assert!(sky.streaks().is_empty());
}

#[test]
fn dots_fade_from_newest_to_oldest() {
    let mut star = ShootingStar::new(Point::ZERO, 8.0, 1.0, 0.5, 0.0);
    for _ in 0..4 {
        star = star.advance(FrameStep::ONE, viewport());
    }
    let dots: Vec<_> = star.dots().collect();
    assert_eq!(dots.len(), 4);
    assert_eq!(dots[0].0, star.head);
    assert!((dots[0].1 - 2.0).abs() < 1e-12);
    assert!((dots[0].2 - 0.5).abs() < 1e-12);
    assert!((dots[3].1 - 0.5).abs() < 1e-12);
    assert!((dots[3].2 - 0.125).abs() < 1e-12);
}

#[test]
fn spawns_land_in_upper_left_region() {
    let vp = viewport();
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..200 {
        let s = ShootingStar::spawn(vp, &mut rng);
        assert!((0.0..800.0).contains(&s.head.x));
        assert!((0.0..320.0).contains(&s.head.y));
        assert!((40.0..120.0).contains(&s.length));
        assert!((6.0..14.0).contains(&s.speed));
        assert!((0.2..0.6).contains(&s.opacity));
        assert!((s.angle - FRAC_PI_4).abs() <= 0.15 + 1e-12);
    }
}

#[test]
fn certain_chance_spawns_every_pass_and_zero_never_does() {
    let vp = viewport();
    let mut rng = fastrand::Rng::with_seed(5);
    let mut sky = ShootingStars::new(1.0);
    for _ in 0..3 {
        sky = sky.advance(FrameStep::ONE, vp, &mut rng);
    }
    assert_eq!(sky.streaks().len(), 3);

    let mut quiet = ShootingStars::new(0.0);
    for _ in 0..1000 {
        quiet = quiet.advance(FrameStep::ONE, vp, &mut rng);
    }
    assert!(quiet.streaks().is_empty());
}
