//! Resolve the API credential from configuration.
//!
//! Order: the secrets file, then the environment, then an `api_key` set in
//! `config.toml` (or via `DOCCHAT_API_KEY` / `OPENAI_API_KEY` overrides).

use crate::secrets::{require_secret, ChainedSecretStore, EnvSecretStore, TomlSecretStore};
use docchat_config::AppConfig;
use docchat_core::error::Error;
use std::collections::HashMap;

/// Build the secret store chain described by `config.secrets`.
pub fn secret_store_from_config(config: &AppConfig) -> Result<ChainedSecretStore, Error> {
    let mut chain = ChainedSecretStore::new()
        .with(TomlSecretStore::load(&config.secrets.path)?)
        .with(EnvSecretStore::new());

    if let Some(key) = &config.api_key {
        let mut values = HashMap::new();
        values.insert(config.secrets.api_key_name.clone(), key.clone());
        chain = chain.with(TomlSecretStore::from_values(values));
    }

    Ok(chain)
}

/// The API key, or an actionable `InvalidConfiguration` error.
pub fn resolve_api_key(config: &AppConfig) -> Result<String, Error> {
    let store = secret_store_from_config(config)?;
    require_secret(&store, &config.secrets.api_key_name, &config.secrets.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secrets(content: Option<&str>) -> (tempfile::TempDir, AppConfig) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        let mut config = AppConfig::default();
        config.secrets.path = path;
        config.secrets.api_key_name = "docchat_test_only_key".into();
        (dir, config)
    }

    #[test]
    fn secrets_file_wins() {
        let (_dir, mut config) =
            config_with_secrets(Some("docchat_test_only_key = \"sk-from-file\""));
        config.api_key = Some("sk-from-config".into());
        assert_eq!(resolve_api_key(&config).unwrap(), "sk-from-file");
    }

    #[test]
    fn config_key_is_last_resort() {
        let (_dir, mut config) = config_with_secrets(None);
        config.api_key = Some("sk-from-config".into());
        assert_eq!(resolve_api_key(&config).unwrap(), "sk-from-config");
    }

    #[test]
    fn absent_everywhere_is_invalid_configuration() {
        let (_dir, config) = config_with_secrets(None);
        let err = resolve_api_key(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }
}
