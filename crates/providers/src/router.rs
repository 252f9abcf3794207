//! Provider selection from configuration.

use std::sync::Arc;

use docchat_config::AppConfig;
use docchat_core::error::ProviderError;
use docchat_core::provider::Provider;
use tracing::debug;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider with an already-resolved API key.
pub fn build_from_config(
    config: &AppConfig,
    api_key: &str,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    debug!(provider = %config.provider, base_url = %base_url, "Building provider");

    Ok(Arc::new(OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
    )?))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => "https://api.openai.com/v1".into(),
    }
}
