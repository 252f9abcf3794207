//! Credential handling for DocChat.
//!
//! Provides:
//! - **Secret stores**: TOML secrets file, environment variables, and chains of both
//! - **Credential resolution**: the API key lookup every command performs at start-up

pub mod credentials;
pub mod secrets;

pub use credentials::{resolve_api_key, secret_store_from_config};
pub use secrets::{require_secret, ChainedSecretStore, EnvSecretStore, TomlSecretStore};
