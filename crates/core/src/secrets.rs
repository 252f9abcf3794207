//! Secret store trait — where the API credential comes from.

/// Read-only key/value lookup for credentials.
///
/// Implementations: TOML secrets file, environment variables, and a chain of
/// stores tried in order.
pub trait SecretStore: Send + Sync {
    /// The store name (e.g., "file", "env").
    fn name(&self) -> &str;

    /// Look up a secret. Empty values count as absent.
    fn get(&self, key: &str) -> Option<String>;
}
