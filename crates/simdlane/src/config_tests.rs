//! Tests for `SimdConfig` source merging.

use serial_test::serial;

use crate::config::{SimdConfig, ENV_PREFIX};
use crate::simd_native::SimdLevel;

#[test]
fn test_default_config_has_no_cap() {
    let config = SimdConfig::default();
    assert_eq!(config.max_level, None);
    assert!(!config.log_bindings);
    assert_eq!(config.rank_cap(), u8::MAX);
}

#[test]
fn test_from_toml_str_parses_level_names() {
    for (name, level) in [
        ("scalar", SimdLevel::Scalar),
        ("neon", SimdLevel::Neon),
        ("avx2", SimdLevel::Avx2),
        ("avx512", SimdLevel::Avx512),
    ] {
        let config = SimdConfig::from_toml_str(&format!("max_level = \"{name}\""))
            .expect("valid toml");
        assert_eq!(config.max_level, Some(level), "level name {name}");
        assert_eq!(config.rank_cap(), level.rank());
    }
}

#[test]
fn test_from_toml_str_rejects_unknown_level() {
    let err = SimdConfig::from_toml_str("max_level = \"sse9\"").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_from_toml_str_keeps_defaults_for_missing_keys() {
    let config = SimdConfig::from_toml_str("log_bindings = true").expect("valid toml");
    assert_eq!(config.max_level, None);
    assert!(config.log_bindings);
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    let key = format!("{ENV_PREFIX}MAX_LEVEL");
    std::env::set_var(&key, "scalar");
    let config = SimdConfig::load();
    std::env::remove_var(&key);

    assert_eq!(config.expect("env config").max_level, Some(SimdLevel::Scalar));
}

#[test]
#[serial]
fn test_from_file_missing_file_uses_defaults() {
    let config = SimdConfig::from_file("/nonexistent/simdlane.toml").expect("missing file is ok");
    assert_eq!(config, SimdConfig::default());
}

#[test]
#[serial]
fn test_from_file_reads_toml_and_env_wins() {
    let dir = std::env::temp_dir().join(format!("simdlane-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("simdlane.toml");
    std::fs::write(&path, "max_level = \"avx512\"\nlog_bindings = true\n").expect("write toml");

    let from_file = SimdConfig::from_file(&path).expect("file config");
    assert_eq!(from_file.max_level, Some(SimdLevel::Avx512));
    assert!(from_file.log_bindings);

    let key = format!("{ENV_PREFIX}MAX_LEVEL");
    std::env::set_var(&key, "avx2");
    let overridden = SimdConfig::from_file(&path);
    std::env::remove_var(&key);
    let _ = std::fs::remove_dir_all(&dir);

    let overridden = overridden.expect("env over file");
    assert_eq!(overridden.max_level, Some(SimdLevel::Avx2));
    assert!(overridden.log_bindings);
}

#[test]
fn test_to_toml_string_round_trips() {
    let config = SimdConfig {
        max_level: Some(SimdLevel::Avx2),
        log_bindings: true,
    };
    let text = config.to_toml_string().expect("serializable");
    assert!(text.contains("max_level = \"avx2\""));
    assert_eq!(SimdConfig::from_toml_str(&text).expect("valid toml"), config);
}
