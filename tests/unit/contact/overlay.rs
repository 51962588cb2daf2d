use super::*;
use crate::{
    contact::form::{EMAIL_REQUIRED, MESSAGE_REQUIRED},
    theme::ThemeName,
};

fn vp() -> Viewport {
    Viewport::new(1280.0, 800.0, 1.0).unwrap()
}

fn opened() -> ContactOverlay {
    let mut overlay = ContactOverlay::new(ContactForm::default());
    overlay.open(&mut fastrand::Rng::with_seed(7));
    overlay
}

fn texts(layer: &LayerPlan) -> Vec<String> {
    layer
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(run) => Some(run.text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn closed_overlay_plans_nothing() {
    let overlay = ContactOverlay::new(ContactForm::default());
    assert!(overlay.plan(vp(), &Theme::default()).is_empty());
}

#[test]
fn card_is_centered_and_capped_in_width() {
    let form = ContactForm::default();
    let l = layout(vp(), &form);
    assert_eq!(l.card.width(), 448.0);
    assert!((l.card.center().x - 640.0).abs() < 1e-9);
    assert!((l.card.center().y - 400.0).abs() < 1e-9);

    let narrow = Viewport::new(320.0, 640.0, 1.0).unwrap();
    assert_eq!(layout(narrow, &form).card.width(), 288.0);
}

#[test]
fn field_errors_grow_the_card() {
    let mut overlay = opened();
    let before = layout(vp(), overlay.form()).card.height();
    assert!(matches!(overlay.form_mut().begin_submit(), SubmitStep::Invalid));
    let after = layout(vp(), overlay.form()).card.height();
    assert_eq!(after - before, 2.0 * FIELD_ERROR_LINE);
}

#[test]
fn clicks_outside_or_on_close_dismiss_the_card() {
    let mut overlay = opened();
    assert_eq!(overlay.click(Point::new(5.0, 5.0), vp()), None);
    assert!(!overlay.is_open());

    let mut overlay = opened();
    let close = layout(vp(), overlay.form()).close_button.center();
    assert_eq!(overlay.hit(close, vp()), OverlayHit::CloseButton);
    overlay.click(close, vp());
    assert!(!overlay.is_open());

    let mut overlay = opened();
    let inside = layout(vp(), overlay.form()).email_field.center();
    assert_eq!(overlay.click(inside, vp()), None);
    assert!(overlay.is_open());
}

#[test]
fn submit_button_click_runs_validation() {
    let mut overlay = opened();
    let button = layout(vp(), overlay.form()).submit_button.center();
    assert!(matches!(
        overlay.click(button, vp()),
        Some(SubmitStep::Invalid)
    ));
    assert_eq!(overlay.form().errors().email, Some(EMAIL_REQUIRED));

    overlay.form_mut().set_email("a@b.co");
    overlay.form_mut().set_message("hello there, friends");
    let button = layout(vp(), overlay.form()).submit_button.center();
    assert!(matches!(
        overlay.click(button, vp()),
        Some(SubmitStep::Ready(_))
    ));
}

#[test]
fn entry_animation_reaches_full_opacity() {
    let mut overlay = opened();
    assert_eq!(overlay.entry_progress(), 0.0);
    for _ in 0..30 {
        overlay.advance(FrameStep::ONE);
    }
    assert!((overlay.entry_progress() - 1.0).abs() < 1e-9);

    let layers = overlay.plan(vp(), &Theme::default());
    let title = layers[1]
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Text(run) if run.text == TITLE => Some(run.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(title.color.a, 1.0);
    assert_eq!(title.size_px, 24.0);
}

#[test]
fn card_starts_small_and_transparent() {
    let overlay = opened();
    let layers = overlay.plan(vp(), &Theme::default());
    assert!(layers[1].ops.iter().all(|op| op.color().a == 0.0));
    let title = layers[1]
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Text(run) if run.text == TITLE => Some(run.size_px),
            _ => None,
        })
        .unwrap();
    assert!((title - 24.0 * 0.9).abs() < 1e-9);
}

#[test]
fn plan_has_backdrop_below_card() {
    let overlay = opened();
    let theme = Theme::builtin(ThemeName::Dark);
    let layers = overlay.plan(vp(), &theme);
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].name, "contact-backdrop");
    assert_eq!(layers[1].name, "contact-card");
    assert!(layers[0].z < layers[1].z);
    assert_eq!(layers[0].ops[0].color(), theme.background.with_alpha(0.95));
    // Full-screen fill, 20 particles, then the scanline band.
    assert_eq!(layers[0].ops.len(), 1 + PARTICLE_COUNT + SCANLINE_STRIPS);
    assert!(layers[1].glow.is_some());
}

#[test]
fn form_labels_and_button_text_follow_state() {
    let mut overlay = opened();
    let layers = overlay.plan(vp(), &Theme::default());
    let t = texts(&layers[1]);
    assert!(t.contains(&"email".to_string()));
    assert!(t.contains(&"message".to_string()));
    assert!(t.contains(&MESSAGE_PLACEHOLDER.to_string()));
    assert!(t.contains(&BUTTON_IDLE.to_string()));

    overlay.form_mut().begin_submit();
    let t = texts(&overlay.plan(vp(), &Theme::default())[1]);
    assert!(t.contains(&MESSAGE_REQUIRED.to_string()));

    overlay.form_mut().set_email("a@b.co");
    overlay.form_mut().set_message("long enough message");
    overlay.form_mut().begin_submit();
    let t = texts(&overlay.plan(vp(), &Theme::default())[1]);
    assert!(t.contains(&BUTTON_BUSY.to_string()));
}

#[test]
fn success_panel_replaces_the_fields() {
    let mut overlay = opened();
    overlay.form_mut().set_email("a@b.co");
    overlay.form_mut().set_message("long enough message");
    overlay.form_mut().begin_submit();
    overlay.form_mut().finish_submit(Ok(()));

    let t = texts(&overlay.plan(vp(), &Theme::default())[1]);
    assert!(t.contains(&crate::contact::form::SUBMIT_SUCCEEDED.to_string()));
    assert!(!t.contains(&BUTTON_IDLE.to_string()));

    let l = layout(vp(), overlay.form());
    assert_eq!(overlay.hit(l.submit_button.center(), vp()), OverlayHit::Card);
}

#[test]
fn fit_line_truncates_long_input() {
    assert_eq!(fit_line("short", 200.0, 14.0), "short");
    let long = "x".repeat(100);
    let cut = fit_line(&long, 90.0, 14.0);
    assert_eq!(cut.chars().count(), 10);
    assert!(cut.ends_with('\u{2026}'));
    assert_eq!(fit_line("first\nsecond", 200.0, 14.0), "first");
}
