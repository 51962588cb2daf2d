use super::*;
use crate::{foundation::core::Vec2, scene::parallax::Permission, theme::ThemeName};

fn viewport(w: f64) -> Viewport {
    Viewport::new(w, 800.0, 1.0).unwrap()
}

#[test]
fn responsive_sizes() {
    assert_eq!(title_size(500.0), 48.0);
    assert_eq!(title_size(768.0), 60.0);
    assert_eq!(title_size(1440.0), 72.0);
    assert_eq!(tagline_size(320.0), (14.0, 20.0));
    assert_eq!(tagline_size(700.0), (16.0, 24.0));
    assert_eq!(tagline_size(1024.0), (18.0, 28.0));
}

#[test]
fn cursor_blinks_on_a_1_2_second_cycle() {
    assert!(cursor_visible(0.0));
    assert!(cursor_visible(0.5));
    assert!(!cursor_visible(0.65));
    assert!(!cursor_visible(1.15));
    assert!(cursor_visible(1.25));
}

#[test]
fn title_run_uses_theme_text_and_centers() {
    let theme = Theme::builtin(ThemeName::Dark);
    let hero = HeroText::new(HeroRole::Title, ParallaxConfig::pointer(0.5));
    let run = hero.text_run(viewport(1200.0), &theme);
    assert_eq!(run.text, "KloudySky");
    assert_eq!(run.align, TextAlign::Center);
    assert_eq!(run.family, FontFamily::Sans);
    assert_eq!(run.weight, 500);
    assert_eq!(run.origin.x, 600.0);
    assert_eq!(run.color, theme.text.opaque());
    assert!(run.origin.y > 280.0 && run.origin.y < 280.0 + 72.0);
}

#[test]
fn tagline_run_is_muted_mono_with_cursor() {
    let theme = Theme::builtin(ThemeName::Light);
    let hero = HeroText::new(HeroRole::Tagline, ParallaxConfig::pointer(0.3));
    let run = hero.text_run(viewport(1200.0), &theme);
    assert_eq!(run.text, "Connect with us");
    assert_eq!(run.family, FontFamily::Mono);
    assert_eq!(run.color, theme.text_muted);
    assert_eq!(run.cursor, Some(true));
    assert!(run.origin.y < 576.0 && run.origin.y > 540.0);

    let later = hero.advance(FrameStep::new(42.0));
    assert_eq!(later.text_run(viewport(1200.0), &theme).cursor, Some(false));
}

#[test]
fn plan_carries_parallax_offset() {
    let vp = viewport(1000.0);
    let mut hero = HeroText::new(HeroRole::Title, ParallaxConfig::pointer(0.5));
    assert!(!hero.on_input(&SceneInput::PointerMove(Point::new(1000.0, 800.0)), vp));
    for _ in 0..30 {
        hero = hero.advance(FrameStep::ONE);
    }
    let plan = hero.plan(vp, &Theme::default());
    assert_eq!(plan.name, "hero-title");
    assert_eq!(plan.z, HERO_Z);
    assert_eq!(plan.offset, Vec2::new(10.0, 7.5));
}

#[test]
fn touch_input_routes_permission_flow() {
    let vp = viewport(400.0);
    let mut hero = HeroText::new(HeroRole::Tagline, ParallaxConfig::touch(0.3, true));
    assert!(hero.on_input(&SceneInput::TouchStart, vp));
    hero.on_input(&SceneInput::PermissionResult(false), vp);
    assert_eq!(hero.parallax().permission(), Permission::Denied);
    hero.on_input(&SceneInput::Orientation { beta: 90.0, gamma: 30.0 }, vp);
    assert_eq!(hero.parallax().offset(), Vec2::ZERO);
}
