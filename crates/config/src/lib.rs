//! Configuration loading, validation, and management for DocChat.
//!
//! Loads configuration from `~/.docchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.docchat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key. Normally resolved through the secret store instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name (`openai`, `ollama`, ...)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used by default
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Model used when `--advanced` is passed
    #[serde(default = "default_advanced_model")]
    pub advanced_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Optional cap on generated tokens per reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_tokens: Option<u32>,

    /// Conversation context settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Document retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Secret store settings
    #[serde(default)]
    pub secrets: SecretsConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_advanced_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("advanced_model", &self.advanced_model)
            .field("default_temperature", &self.default_temperature)
            .field("max_response_tokens", &self.max_response_tokens)
            .field("context", &self.context)
            .field("retrieval", &self.retrieval)
            .field("secrets", &self.secrets)
            .finish()
    }
}

/// How the conversation window sent to the model is bounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Token ceiling for one request, system message included
    #[serde(default = "default_token_budget")]
    pub token_budget: i64,

    /// Token counting strategy
    #[serde(default)]
    pub tokenizer: TokenizerKind,

    /// Path to a `tokenizer.json`, required when `tokenizer = "model"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,

    /// System instructions for free-form chat
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

/// Token counting strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Character heuristic, no external files
    #[default]
    Approximate,
    /// Exact count from a model tokenizer file
    Model,
}

fn default_token_budget() -> i64 {
    3000
}
fn default_system_prompt() -> String {
    "You are a helpful AI assistant.".into()
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            tokenizer: TokenizerKind::default(),
            tokenizer_path: None,
            system_prompt: default_system_prompt(),
        }
    }
}

/// Where documents for retrieval come from and how they are indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Folder scanned for `.pdf` files by `docchat index`
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Persisted vector collection
    #[serde(default = "default_collection_path")]
    pub collection_path: PathBuf,

    /// Collection name
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// Characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunks retrieved per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_documents_dir() -> PathBuf {
    AppConfig::config_dir().join("documents")
}
fn default_collection_path() -> PathBuf {
    AppConfig::config_dir().join("db").join("collection.json")
}
fn default_collection_name() -> String {
    "documents".into()
}
fn default_chunk_size() -> usize {
    500
}
fn default_top_k() -> usize {
    3
}
fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            collection_path: default_collection_path(),
            collection_name: default_collection_name(),
            chunk_size: default_chunk_size(),
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// TOML secrets file consulted before the environment
    #[serde(default = "default_secrets_path")]
    pub path: PathBuf,

    /// Key holding the API credential
    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,
}

fn default_secrets_path() -> PathBuf {
    AppConfig::config_dir().join("secrets.toml")
}
fn default_api_key_name() -> String {
    "api_key".into()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: default_secrets_path(),
            api_key_name: default_api_key_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.docchat/config.toml).
    ///
    /// Environment overrides:
    /// - `DOCCHAT_API_KEY`, then `OPENAI_API_KEY`
    /// - `DOCCHAT_MODEL`
    /// - `DOCCHAT_TOKEN_BUDGET`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            self.api_key = std::env::var("DOCCHAT_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .filter(|k| !k.is_empty());
        }

        if let Ok(model) = std::env::var("DOCCHAT_MODEL") {
            self.default_model = model;
        }

        if let Ok(budget) = std::env::var("DOCCHAT_TOKEN_BUDGET") {
            self.context.token_budget = budget.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "DOCCHAT_TOKEN_BUDGET must be an integer, got {budget:?}"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".docchat")
    }

    /// Pick the model for a request.
    pub fn model_for(&self, advanced: bool) -> &str {
        if advanced {
            &self.advanced_model
        } else {
            &self.default_model
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.context.token_budget <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "context.token_budget must be a positive integer, got {}",
                self.context.token_budget
            )));
        }

        if self.context.tokenizer == TokenizerKind::Model && self.context.tokenizer_path.is_none()
        {
            return Err(ConfigError::ValidationError(
                "context.tokenizer_path is required when context.tokenizer = \"model\"".into(),
            ));
        }

        if self.retrieval.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.chunk_size must be > 0".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            default_model: default_model(),
            advanced_model: default_advanced_model(),
            default_temperature: default_temperature(),
            max_response_tokens: None,
            context: ContextConfig::default(),
            retrieval: RetrievalConfig::default(),
            secrets: SecretsConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
