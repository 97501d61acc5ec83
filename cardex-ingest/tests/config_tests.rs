//! Vision API key resolution tests
//!
//! Tests that touch CARDEX_VISION_API_KEY are marked #[serial] so they never
//! race on the process environment.

use cardex_common::config::TomlConfig;
use cardex_common::Error;
use cardex_ingest::config::{resolve_vision_api_key, VISION_API_KEY_ENV_VAR};
use serial_test::serial;

fn toml_with_key(key: Option<&str>) -> TomlConfig {
    TomlConfig {
        vision_api_key: key.map(str::to_string),
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(VISION_API_KEY_ENV_VAR, "env-key");

    let key = resolve_vision_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "env-key");

    std::env::remove_var(VISION_API_KEY_ENV_VAR);
}

#[test]
#[serial]
fn test_toml_fallback_when_env_unset() {
    std::env::remove_var(VISION_API_KEY_ENV_VAR);

    let key = resolve_vision_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "toml-key");
}

#[test]
#[serial]
fn test_blank_env_ignored() {
    std::env::set_var(VISION_API_KEY_ENV_VAR, "   ");

    let key = resolve_vision_api_key(&toml_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "toml-key");

    std::env::remove_var(VISION_API_KEY_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_key_is_config_error() {
    std::env::remove_var(VISION_API_KEY_ENV_VAR);

    let err = resolve_vision_api_key(&toml_with_key(Some(""))).unwrap_err();
    match err {
        Error::Config(message) => {
            assert!(message.contains(VISION_API_KEY_ENV_VAR));
            assert!(message.contains("vision_api_key"));
        }
        other => panic!("expected config error, got {:?}", other),
    }
}
