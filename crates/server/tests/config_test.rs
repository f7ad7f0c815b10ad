//! # Configuration Tests
//!
//! These tests mutate process environment variables, so each one runs under
//! `#[serial]` to keep them from interfering with each other.

use bystander_server::config::{get_config, ConfigError};
use serial_test::serial;
use std::{env, fs};
use tempfile::tempdir;

/// Clears every environment variable `get_config` reads.
fn clear_env_vars() {
    for var in [
        "PORT",
        "ACTIVE_PROVIDER",
        "CLAUDE_KEY",
        "DEEPSEEK_API_KEY",
        "BYSTANDER_PORT",
        "BYSTANDER_PROVIDERS__CLAUDE__MODEL_NAME",
        "TEST_CLAUDE_URL",
    ] {
        env::remove_var(var);
    }
}

fn write_config(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
#[serial]
fn test_defaults_without_file_or_keys() {
    clear_env_vars();
    let (_dir, path) = write_config("{}\n");

    let config = get_config(Some(&path)).expect("defaults should load");

    assert_eq!(config.port, 5001);
    assert_eq!(config.active_provider, "claude");
    let claude = config.active().unwrap();
    assert_eq!(claude.model_name, "claude-3-haiku-20240307");
    assert_eq!(claude.max_tokens, 1024);
    assert!((claude.temperature - 0.6).abs() < f32::EPSILON);
    assert!(claude.system_prompt.is_some());
    // A missing key disables the provider, it is not an error.
    assert!(claude.api_key.is_none());
    assert_eq!(config.providers["deepseek"].model_name, "deepseek-chat");
}

#[test]
#[serial]
fn test_secrets_are_read_from_env() {
    clear_env_vars();
    env::set_var("CLAUDE_KEY", "sk-ant-test");
    env::set_var("DEEPSEEK_API_KEY", "sk-ds-test");
    let (_dir, path) = write_config("{}\n");

    let config = get_config(Some(&path)).unwrap();

    assert_eq!(
        config.providers["claude"].api_key.as_deref(),
        Some("sk-ant-test")
    );
    assert_eq!(
        config.providers["deepseek"].api_key.as_deref(),
        Some("sk-ds-test")
    );
    clear_env_vars();
}

#[test]
#[serial]
fn test_file_values_and_substitution() {
    clear_env_vars();
    env::set_var("TEST_CLAUDE_URL", "http://127.0.0.1:9999/v1/messages");
    let (_dir, path) = write_config(
        r#"
port: 8080
active_provider: deepseek
providers:
  claude:
    provider: claude
    api_url: "${TEST_CLAUDE_URL}"
    model_name: claude-test
  deepseek:
    provider: deepseek
    model_name: deepseek-test
    temperature: 0.2
"#,
    );

    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.active_provider, "deepseek");
    assert_eq!(
        config.providers["claude"].api_url.as_deref(),
        Some("http://127.0.0.1:9999/v1/messages")
    );
    let deepseek = config.active().unwrap();
    assert_eq!(deepseek.model_name, "deepseek-test");
    assert!((deepseek.temperature - 0.2).abs() < f32::EPSILON);
    // Unset fields keep their defaults.
    assert_eq!(deepseek.max_tokens, 1024);
    clear_env_vars();
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env_vars();
    env::set_var("PORT", "7070");
    env::set_var("BYSTANDER_PROVIDERS__CLAUDE__MODEL_NAME", "claude-from-env");
    let (_dir, path) = write_config("port: 8080\n");

    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.port, 7070);
    assert_eq!(config.providers["claude"].model_name, "claude-from-env");
    clear_env_vars();
}

#[test]
#[serial]
fn test_unknown_active_provider() {
    clear_env_vars();
    let (_dir, path) = write_config("active_provider: gemini\n");

    let result = get_config(Some(&path));

    assert!(matches!(
        result,
        Err(ConfigError::UnknownProvider(name)) if name == "gemini"
    ));
}

#[test]
#[serial]
fn test_missing_override_file() {
    clear_env_vars();
    let result = get_config(Some("/nonexistent/bystander/config.yml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}
