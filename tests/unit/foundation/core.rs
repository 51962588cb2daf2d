use super::*;
use std::time::Duration;

#[test]
fn frame_step_converts_wall_clock_to_reference_frames() {
    let step = FrameStep::from_duration(Duration::from_millis(500));
    assert!((step.frames() - 30.0).abs() < 1e-9);
    assert!((FrameStep::for_fps(30).frames() - 2.0).abs() < 1e-9);
    assert_eq!(FrameStep::for_fps(0).frames(), 0.0);
    assert_eq!(FrameStep::new(-3.0).frames(), 0.0);
    assert_eq!(FrameStep::new(f64::NAN).frames(), 0.0);
}

#[test]
fn viewport_rejects_bad_dimensions() {
    assert!(Viewport::new(-1.0, 10.0, 1.0).is_err());
    assert!(Viewport::new(10.0, f64::INFINITY, 1.0).is_err());
    assert!(Viewport::new(10.0, 10.0, 0.0).is_err());
    assert!(Viewport::new(0.0, 0.0, 1.0).is_ok());
}

#[test]
fn viewport_pixel_size_follows_device_pixel_ratio() {
    let vp = Viewport::new(400.0, 300.0, 2.0).unwrap();
    assert_eq!(vp.pixel_size(), (800, 600));
    assert_eq!(vp.center(), Point::new(200.0, 150.0));
    assert!(vp.is_drawable());
    assert!(!Viewport::new(0.0, 300.0, 1.0).unwrap().is_drawable());
}

#[test]
fn rgb_hex_parses_with_and_without_hash() {
    assert_eq!(Rgb::from_hex("#3a3a3c").unwrap(), Rgb::new(58, 58, 60));
    assert_eq!(Rgb::from_hex("ff6030").unwrap(), Rgb::new(255, 96, 48));
    assert_eq!(Rgb::new(96, 96, 255).to_hex(), "#6060ff");
    assert_eq!(Rgb::new(255, 96, 48).triple(), "255, 96, 48");
    assert!(Rgb::from_hex("#fff").is_err());
    assert!(Rgb::from_hex("#gggggg").is_err());
}

#[test]
fn premultiply_rounds_channels() {
    let c = Rgba8Premul::from(Rgb::WHITE.with_alpha(0.5));
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(
        Rgba8Premul::from_straight_rgba(10, 20, 30, 0),
        Rgba8Premul::transparent()
    );
}

#[test]
fn oversized_frame_step_saturates_its_duration() {
    assert_eq!(FrameStep::new(1e30).as_duration(), Duration::MAX);
    assert_eq!(
        FrameStep::from_duration(Duration::MAX).as_duration(),
        Duration::MAX
    );
    assert_eq!(FrameStep::new(60.0).as_duration(), Duration::from_secs(1));
}
