//! # Application Configuration
//!
//! Loads the `bystander-server` configuration from programmatic defaults, an
//! optional `config.yml` and the environment. Provider secrets are never written
//! to the file; they are read from `CLAUDE_KEY` and `DEEPSEEK_API_KEY`.

use bystander::{
    prompts::tasks::{CLAUDE_SYSTEM_PROMPT, DEEPSEEK_SYSTEM_PROMPT},
    providers::{
        ai::{claude::DEFAULT_CLAUDE_MODEL, deepseek::DEFAULT_DEEPSEEK_MODEL},
        factory::ProviderKind,
    },
};
use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::{info, warn};

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
    /// The active provider has no entry in the `providers` table.
    UnknownProvider(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::UnknownProvider(name) => {
                write!(f, "Active provider '{name}' is not configured")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The key of the provider in `providers` used to serve requests.
    #[serde(default = "default_active_provider")]
    pub active_provider: String,
    /// Named provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_port() -> u16 {
    5001
}

fn default_active_provider() -> String {
    "claude".to_string()
}

/// Connection and generation settings for one provider.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The backend kind ("claude" or "deepseek").
    pub provider: String,
    /// The API URL. Falls back to the backend's public endpoint.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Filled from the environment after loading. `None` disables the provider.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.6
}

impl AppConfig {
    /// The configuration of the provider that serves requests.
    pub fn active(&self) -> Result<&ProviderConfig, ConfigError> {
        self.providers
            .get(&self.active_provider)
            .ok_or_else(|| ConfigError::UnknownProvider(self.active_provider.clone()))
    }
}

/// The built-in provider table, used as the lowest configuration layer.
fn build_default_providers() -> HashMap<String, ConfigValue> {
    [
        ("claude", DEFAULT_CLAUDE_MODEL, CLAUDE_SYSTEM_PROMPT),
        ("deepseek", DEFAULT_DEEPSEEK_MODEL, DEEPSEEK_SYSTEM_PROMPT),
    ]
    .into_iter()
    .map(|(name, model, system_prompt)| {
        let mut table = HashMap::new();
        table.insert("provider".to_string(), ConfigValue::from(name));
        table.insert("model_name".to_string(), ConfigValue::from(model));
        table.insert(
            "max_tokens".to_string(),
            ConfigValue::from(i64::from(default_max_tokens())),
        );
        table.insert(
            "temperature".to_string(),
            ConfigValue::from(f64::from(default_temperature())),
        );
        table.insert(
            "system_prompt".to_string(),
            ConfigValue::from(system_prompt),
        );
        (
            name.to_string(),
            ConfigValue::new(None, ConfigValueKind::Table(table)),
        )
    })
    .collect()
}

// Reads a file and substitutes `${VAR}` references from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Layers, lowest first:
/// - built-in defaults for the `claude` and `deepseek` providers,
/// - `config.yml` next to the crate manifest, or the file at `config_path_override`,
/// - top-level env vars such as `PORT` and `ACTIVE_PROVIDER`,
/// - nested `BYSTANDER_...` env vars (e.g. `BYSTANDER_PROVIDERS__CLAUDE__MODEL_NAME`).
///
/// An override path that does not exist is an error; a missing default file is not.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        .set_default("port", i64::from(default_port()))?
        .set_default("active_provider", default_active_provider())?
        .set_default("providers", build_default_providers())?;

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&user_config_path)? {
                info!("Loading user-defined configuration from '{user_config_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("'{user_config_path}' not found. Using built-in defaults.");
            }
        }
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("BYSTANDER")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Secrets come from the environment only. A missing key disables that
    // provider, it never stops the server from starting.
    for (name, provider_config) in config.providers.iter_mut() {
        if provider_config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            continue;
        }
        let kind: ProviderKind = match provider_config.provider.parse() {
            Ok(kind) => kind,
            Err(e) => return Err(ConfigError::General(format!("provider '{name}': {e}"))),
        };
        provider_config.api_key = env::var(kind.api_key_env()).ok().filter(|k| !k.is_empty());
        if provider_config.api_key.is_none() {
            warn!(
                "{} is not set; provider '{name}' will answer with fallback messages.",
                kind.api_key_env()
            );
        }
    }

    config.active()?;
    Ok(config)
}
