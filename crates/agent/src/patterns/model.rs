//! The model a workflow talks to: provider plus request settings.

use crate::stream_event::{ChatStreamEvent, relay_stream};
use docchat_config::AppConfig;
use docchat_core::error::Error;
use docchat_core::message::Message;
use docchat_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Clone)]
pub struct ChatModel {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    /// Default or advanced model from config, with its temperature and cap.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig, advanced: bool) -> Self {
        Self::new(provider, config.model_for(advanced))
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.max_response_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn request(&self, messages: Vec<Message>, stream: bool) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream,
        }
    }

    /// One non-streaming completion.
    pub async fn complete(&self, messages: Vec<Message>) -> Result<ProviderResponse, Error> {
        debug!(model = %self.model, messages = messages.len(), "Requesting completion");
        Ok(self.provider.complete(self.request(messages, false)).await?)
    }

    /// Stream a completion, forwarding fragments to `events`.
    pub async fn stream(
        &self,
        messages: Vec<Message>,
        events: &mpsc::Sender<ChatStreamEvent>,
    ) -> Result<(String, Option<Usage>), Error> {
        debug!(model = %self.model, messages = messages.len(), "Requesting streamed completion");
        let rx = match self.provider.stream(self.request(messages, true)).await {
            Ok(rx) => rx,
            Err(e) => {
                let _ = events
                    .send(ChatStreamEvent::Error {
                        message: format!("Provider error: {e}"),
                    })
                    .await;
                return Err(e.into());
            }
        };
        Ok(relay_stream(rx, events).await?)
    }
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
