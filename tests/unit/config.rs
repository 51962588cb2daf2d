use super::*;

#[test]
fn defaults_match_the_site() {
    let cfg = SiteConfig::default();
    assert_eq!(cfg.theme, ThemeName::Light);
    assert_eq!(cfg.grid_style, GridStyle::Curved);
    assert_eq!(cfg.star_count, 40);
    assert_eq!(cfg.shooting_star_chance, 0.003);
    assert_eq!(cfg.parallax.hero_intensity, 0.5);
    assert_eq!(cfg.parallax.tagline_intensity, 0.3);
    assert_eq!(cfg.relay.endpoint, "https://api.web3forms.com/submit");
    assert_eq!(cfg.relay.from_name, "KloudySky Contact Form");
    assert_eq!(cfg.auto_close(), Duration::from_secs(2));
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "theme": "midnight", "grid_style": "perspective", "parallax": { "input": "touch" } }"#;
    let cfg = SiteConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.theme, ThemeName::Midnight);
    assert_eq!(cfg.grid_style, GridStyle::Perspective);
    assert_eq!(cfg.parallax.input, InputMode::Touch);
    assert_eq!(cfg.parallax.touch_multiplier, 2.0);
    assert_eq!(cfg.star_count, 40);
}

#[test]
fn unknown_theme_and_fields_are_rejected() {
    let err = SiteConfig::from_reader(r#"{ "theme": "neon" }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().starts_with("config error:"));
    assert!(SiteConfig::from_reader(r#"{ "colour": "red" }"#.as_bytes()).is_err());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut cfg = SiteConfig {
        shooting_star_chance: 1.5,
        ..SiteConfig::default()
    };
    assert!(cfg.validate().is_err());

    cfg.shooting_star_chance = 0.01;
    cfg.parallax.hero_intensity = 0.0;
    assert!(cfg.validate().is_err());

    cfg.parallax.hero_intensity = 0.5;
    cfg.relay.endpoint = "  ".to_string();
    assert!(cfg.validate().is_err());

    cfg.relay.endpoint = DEFAULT_RELAY_ENDPOINT.to_string();
    cfg.relay.timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn configured_access_key_wins() {
    let relay = RelaySettings {
        access_key: Some("abc123".to_string()),
        ..RelaySettings::default()
    };
    assert_eq!(relay.resolved_access_key(), "abc123");
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.json");
    std::fs::write(&path, r#"{ "star_count": 12, "auto_close_ms": 500 }"#).unwrap();
    let cfg = SiteConfig::load(&path).unwrap();
    assert_eq!(cfg.star_count, 12);
    assert_eq!(cfg.auto_close(), Duration::from_millis(500));

    assert!(SiteConfig::load(dir.path().join("missing.json")).is_err());
}
