use spotdash::config::Config;
use std::fs;

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.web.host = "0.0.0.0".to_string();
    cfg.charging.window_hours = 6;
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.web.host, "0.0.0.0");
    assert_eq!(loaded.charging.window_hours, 6);
    assert_eq!(loaded.logging.file, cfg.logging.file);
}

#[test]
fn config_validation_errors() {
    let mut cfg = Config::default();

    // Invalid port
    cfg.web.port = 0;
    assert!(cfg.validate().is_err());

    // Empty feed URL
    cfg = Config::default();
    cfg.feed.base_url.clear();
    assert!(cfg.validate().is_err());

    // Zero timeout
    cfg = Config::default();
    cfg.feed.timeout_secs = 0;
    assert!(cfg.validate().is_err());

    // Non-positive fallback FX rate
    cfg = Config::default();
    cfg.feed.fallback_eur_to_nok = 0.0;
    assert!(cfg.validate().is_err());

    // Unknown publication timezone
    cfg = Config::default();
    cfg.cache.publish_timezone = "Atlantis/Lost_City".to_string();
    assert!(cfg.validate().is_err());

    // Malformed cutoff
    cfg = Config::default();
    cfg.cache.publish_cutoff = "noonish".to_string();
    assert!(cfg.validate().is_err());

    // Zero recheck interval
    cfg = Config::default();
    cfg.cache.recheck_interval_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"bad: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}

#[test]
fn cutoff_parses_to_minutes() {
    let mut cfg = Config::default();
    cfg.cache.publish_cutoff = "13:00".to_string();
    assert_eq!(cfg.publish_cutoff_minutes().unwrap(), 13 * 60);
}
