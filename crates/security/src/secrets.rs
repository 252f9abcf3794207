//! Secret stores for the API credential.
//!
//! Secrets live in a flat TOML file (`key = "value"` pairs, default
//! `~/.docchat/secrets.toml`) or in the environment. A chain tries each
//! store in order and returns the first non-empty value.

use docchat_core::error::Error;
use docchat_core::secrets::SecretStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Secrets read once from a TOML file.
pub struct TomlSecretStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl TomlSecretStore {
    /// Load secrets from `path`.
    ///
    /// A missing file yields an empty store; a malformed one is a
    /// configuration error so a typo never silently hides the key.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let values = match std::fs::read_to_string(path) {
            Ok(content) => parse_secrets(&content).map_err(|reason| {
                Error::invalid_configuration(format!(
                    "Failed to parse secrets file {}: {reason}",
                    path.display()
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No secrets file");
                HashMap::new()
            }
            Err(e) => {
                return Err(Error::invalid_configuration(format!(
                    "Failed to read secrets file {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Build a store from in-memory values.
    pub fn from_values(values: HashMap<String, String>) -> Self {
        Self {
            path: PathBuf::new(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Keep only top-level string values; tables and numbers are ignored.
fn parse_secrets(content: &str) -> Result<HashMap<String, String>, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(table
        .into_iter()
        .filter_map(|(k, v)| match v {
            toml::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}

impl SecretStore for TomlSecretStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Secrets from environment variables.
///
/// `get("api_key")` checks `DOCCHAT_API_KEY`, then `API_KEY`.
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::with_prefix("DOCCHAT_")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn candidates(&self, key: &str) -> [String; 2] {
        let upper = key.to_ascii_uppercase();
        [format!("{}{upper}", self.prefix), upper]
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.candidates(key)
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
    }
}

/// Tries each store in order.
#[derive(Default)]
pub struct ChainedSecretStore {
    stores: Vec<Box<dyn SecretStore>>,
}

impl ChainedSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, store: impl SecretStore + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }
}

impl SecretStore for ChainedSecretStore {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores.iter().find_map(|store| {
            let value = store.get(key);
            if value.is_some() {
                debug!(store = store.name(), key, "Secret resolved");
            }
            value
        })
    }
}

/// Look up a required secret.
///
/// Absence is fatal: the error tells the user where the key is expected.
pub fn require_secret(store: &dyn SecretStore, key: &str, hint: &Path) -> Result<String, Error> {
    store.get(key).ok_or_else(|| {
        warn!(key, "Required secret not found");
        Error::invalid_configuration(format!(
            "API key `{key}` not found. Add `{key} = \"sk-...\"` to {} or set DOCCHAT_{}.",
            hint.display(),
            key.to_ascii_uppercase()
        ))
    })
}
