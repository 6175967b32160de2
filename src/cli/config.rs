// Server Configuration Module
// Startup configuration from a YAML file with CLI overrides. The fake reply
// settings here are only the seed; at runtime they live in the ConfigStore
// and are mutated through the admin API.

use crate::store::{FakeConfig, ModelReply, ReplyMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fakes: FakesConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build the initial fake configuration seeded into the ConfigStore
    pub fn initial_fakes(&self) -> FakeConfig {
        let mut models = BTreeMap::new();
        models.insert(
            self.fakes.default_model.clone(),
            ModelReply {
                name: self.fakes.default_model.clone(),
                reply_content: self.fakes.reply_content.clone(),
                response_delay: self.fakes.response_delay,
                reply_mode: ReplyMode::Preset,
            },
        );
        for model in &self.fakes.models {
            models.insert(model.name.clone(), model.clone());
        }

        FakeConfig {
            api_key: self.fakes.api_key.clone(),
            default_model: self.fakes.default_model.clone(),
            models,
        }
    }
}

/// Server network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Password for the admin login endpoint
    #[serde(default = "default_admin_password")]
    pub password: String,
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: default_admin_password(),
        }
    }
}

/// Durable storage and static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File the request log is persisted to (best-effort)
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Directory served for static assets, with SPA fallback to its
    /// index.html
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_log_file() -> String {
    "request_logs.json".to_string()
}

fn default_static_dir() -> String {
    "public".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            static_dir: default_static_dir(),
        }
    }
}

/// Initial fake reply configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakesConfig {
    /// API key both simulated surfaces authenticate against
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Model used when a request names no model or an unknown one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Reply content of the default model
    #[serde(default = "default_reply_content")]
    pub reply_content: String,
    /// Response delay of the default model, in milliseconds
    #[serde(default)]
    pub response_delay: u64,
    /// Additional per-model reply entries
    #[serde(default)]
    pub models: Vec<ModelReply>,
}

fn default_api_key() -> String {
    "sk-fake-gpt-key-123456789".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_reply_content() -> String {
    "Hello! I am a fake GPT model. This is a simulated response.".to_string()
}

impl Default for FakesConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            default_model: default_model(),
            reply_content: default_reply_content(),
            response_delay: 0,
            models: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
