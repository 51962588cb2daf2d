use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KloudyError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KloudyError::render("x").to_string().contains("render error:"));
    assert!(KloudyError::relay("x").to_string().contains("relay error:"));
    assert!(KloudyError::config("x").to_string().contains("config error:"));
    assert!(
        KloudyError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KloudyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: KloudyError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, KloudyError::Serde(_)));
}
