//! Application configuration.
//!
//! Settings are read from a TOML file. The path comes from `CAPTIONISTA_CONFIG`
//! when set, otherwise `captionista.toml` in the working directory is used if it
//! exists. Every field has a default, so an absent file is not an error.

use crate::error::{ConfigError, CoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "CAPTIONISTA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "captionista.toml";

const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mixtral-8x7B-Instruct-v0.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Caption catalog to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    pub default_top_n: usize,
    pub max_top_n: usize,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_url: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
    pub timeout_seconds: u64,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_top_n: 3,
            max_top_n: 5,
            llm: LlmSettings::default(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            max_new_tokens: 150,
            temperature: 0.75,
            top_p: 0.9,
            do_sample: true,
            timeout_seconds: 60,
            token_env: "HF_TOKEN".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the config file location and load it.
    pub fn load() -> Result<Self, CoreError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    info!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        debug!("Loading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let config: Self = toml::from_str(raw).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_top_n == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_top_n".to_string(),
                value: self.max_top_n.to_string(),
            });
        }
        if self.default_top_n == 0 || self.default_top_n > self.max_top_n {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "default_top_n must be between 1 and {}, got {}",
                    self.max_top_n, self.default_top_n
                ),
            });
        }
        self.llm.validate()
    }

    /// Clamp a requested result count into `1..=max_top_n`.
    pub fn clamp_top_n(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_top_n)
    }
}

impl LlmSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidValue {
            field: "llm.api_url".to_string(),
            value: format!("{} ({})", self.api_url, e),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "llm.api_url".to_string(),
                value: self.api_url.clone(),
            });
        }
        if self.temperature <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                value: self.temperature.to_string(),
            });
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.top_p".to_string(),
                value: self.top_p.to_string(),
            });
        }
        if self.token_env.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "llm.token_env".to_string(),
            });
        }
        Ok(())
    }

    /// Bearer token for the text-generation endpoint.
    pub fn api_token(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(ConfigError::MissingEnvironmentVariable {
                var_name: self.token_env.clone(),
            }),
        }
    }
}
