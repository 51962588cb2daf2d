use super::*;

fn vp() -> Viewport {
    Viewport::new(100.0, 50.0, 1.0).unwrap()
}

#[test]
fn layers_are_kept_in_z_order_stable_for_ties() {
    let mut plan = FramePlan::new(vp(), Rgb::BLACK);
    plan.push_layer(LayerPlan::new("grid", 10));
    plan.push_layer(LayerPlan::new("stars", 5));
    plan.push_layer(LayerPlan::new("hero", 30));
    plan.push_layer(LayerPlan::new("tagline", 30));
    plan.push_layer(LayerPlan::new("streaks", 6));

    let names: Vec<_> = plan.layers.iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["stars", "streaks", "grid", "hero", "tagline"]);
    assert!(plan.layer("grid").is_some());
    assert!(plan.layer("missing").is_none());
}

#[test]
fn op_count_includes_glow_ops() {
    let white = Rgb::WHITE.opaque();
    let mut layer = LayerPlan::new("horizon", 10);
    assert!(layer.is_empty());
    layer.ops.push(DrawOp::circle(Point::new(1.0, 1.0), 1.0, white));
    layer.glow = Some(GlowPass {
        ops: vec![DrawOp::quad_stroke(
            Point::new(0.0, 10.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 10.0),
            3.5,
            white,
        )],
        blur_px: 100.0,
        offset: Vec2::new(0.0, -25.0),
        opacity: 1.0,
        repeats: 2,
    });
    assert!(!layer.is_empty());

    let mut plan = FramePlan::new(vp(), Rgb::BLACK);
    plan.push_layer(layer);
    assert_eq!(plan.op_count(), 2);
}

#[test]
fn circle_op_bounds_match_radius() {
    use kurbo::Shape as _;
    let op = DrawOp::circle(Point::new(10.0, 20.0), 2.0, Rgb::WHITE.with_alpha(0.5));
    let DrawOp::FillPath { path, color } = op else {
        panic!("expected a fill");
    };
    let bb = path.bounding_box();
    assert!((bb.width() - 4.0).abs() < 0.1);
    assert!((bb.center().x - 10.0).abs() < 0.1);
    assert_eq!(color.a, 0.5);
}
