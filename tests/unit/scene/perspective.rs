use super::*;

fn viewport() -> Viewport {
    Viewport::new(1000.0, 1000.0, 1.0).unwrap()
}

#[test]
fn rows_stay_above_the_fade_line() {
    let mut grid = PerspectiveGrid::default();
    for _ in 0..240 {
        grid = grid.advance(FrameStep::ONE);
        let rows = grid.rows(viewport());
        assert!(!rows.is_empty());
        for r in rows {
            assert!(r.y < 750.0);
            assert!(r.scale >= 0.02);
            assert!(r.alpha <= 0.5);
            assert!(r.curvature <= 0.0);
        }
    }
}

#[test]
fn first_row_sits_on_horizon_at_zero_offset() {
    let rows = PerspectiveGrid::default().rows(viewport());
    let first = rows[0];
    assert!((first.y - 350.0).abs() < 1e-9);
    assert!((first.scale - 1.0).abs() < 1e-12);
    assert!((first.half_width - 900.0).abs() < 1e-9);
    assert!((first.alpha - 0.5).abs() < 1e-12);
}

#[test]
fn scroll_wraps_every_spacing() {
    let a = PerspectiveGrid { offset: 10.0 }.rows(viewport());
    let b = PerspectiveGrid { offset: 70.0 }.rows(viewport());
    assert_eq!(a, b);
}

#[test]
fn plan_counts() {
    let grid = PerspectiveGrid::default();
    let plan = grid.plan(viewport(), &Theme::default());
    let rows = grid.rows(viewport()).len();
    assert_eq!(plan.ops.len(), GLOW_STRIPS + rows + 36);
    assert!(
        PerspectiveGrid::default()
            .plan(Viewport::new(0.0, 0.0, 1.0).unwrap(), &Theme::default())
            .is_empty()
    );
}
