//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, llama.cpp and any
//! endpoint exposing `/v1/chat/completions` and `/v1/embeddings`.
//!
//! Supports:
//! - Chat completions (non-streaming and streaming SSE)
//! - Embeddings
//! - Model listing and health checks

use async_trait::async_trait;
use docchat_core::error::ProviderError;
use docchat_core::message::{Message, Role};
use docchat_core::provider::*;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Result<Self, ProviderError> {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().to_string(),
                content: Some(m.content.clone()),
            })
            .collect()
    }

    fn request_body(request: &ProviderRequest, stream: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
            "stream": stream,
        });

        if stream {
            body["stream_options"] = serde_json::json!({ "include_usage": true });
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Map non-success statuses to the error taxonomy.
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ModelNotFound(error_body));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }

    /// POST `body` to `{base_url}/{path}` and check the status.
    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
        accept: Option<&str>,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body);
        if let Some(accept) = accept {
            builder = builder.header("Accept", accept);
        }

        let response = builder.send().await.map_err(Self::network_error)?;
        self.check_status(response).await
    }

    async fn get_models(&self) -> Result<reqwest::Response, ProviderError> {
        self.client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::network_error)
    }

    fn network_error(e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let body = Self::request_body(&request, false);

        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self.post("chat/completions", &body, None).await?;
        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(Usage::from);

        Ok(ProviderResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            usage,
            model: api_response.model,
        })
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let response = self.check_status(self.get_models().await?).await?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let models = body["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let response = self.get_models().await?;
        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key".into(),
            ));
        }

        Ok(response.status().is_success())
    }

    async fn embed(
        &self,
        request: EmbeddingRequest,
    ) -> std::result::Result<EmbeddingResponse, ProviderError> {
        let body = serde_json::json!({
            "model": request.model,
            "input": request.inputs,
            "encoding_format": "float",
        });

        debug!(
            provider = %self.name,
            model = %request.model,
            count = request.inputs.len(),
            "Sending embedding request"
        );

        let response = self.post("embeddings", &body, None).await?;
        let api_resp: EmbeddingApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse embedding response: {e}"),
            })?;

        let mut data = api_resp.data;
        data.sort_by_key(|d| d.index);
        let embeddings = data.into_iter().map(|d| d.embedding).collect();

        let usage = api_resp.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: 0,
            total_tokens: u.total_tokens,
        });

        Ok(EmbeddingResponse {
            embeddings,
            model: api_resp.model,
            usage,
        })
    }

    async fn stream(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<StreamReceiver, ProviderError> {
        let body = Self::request_body(&request, true);

        debug!(provider = %self.name, model = %request.model, "Sending streaming request");

        let response = self
            .post("chat/completions", &body, Some("text/event-stream"))
            .await?;

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        let provider_name = self.name.clone();

        // Read the SSE byte stream and forward parsed chunks
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                // Multi-byte characters may straddle reads; decode whole lines only
                buffer.extend_from_slice(&bytes);

                while let Some(line) = take_line(&mut buffer) {

                    match parse_sse_line(&line) {
                        SseEvent::Skip => {}
                        SseEvent::Done => {
                            let _ = tx.send(Ok(final_chunk(None))).await;
                            return;
                        }
                        SseEvent::Invalid(error) => {
                            trace!(
                                provider = %provider_name,
                                line = %line,
                                error = %error,
                                "Ignoring unparseable SSE chunk"
                            );
                        }
                        SseEvent::Data(stream_resp) => {
                            if let Some(content) = stream_resp
                                .choices
                                .first()
                                .and_then(|c| c.delta.content.clone())
                                .filter(|c| !c.is_empty())
                            {
                                let chunk = StreamChunk {
                                    content: Some(content),
                                    done: false,
                                    usage: None,
                                };
                                if tx.send(Ok(chunk)).await.is_err() {
                                    return; // receiver dropped
                                }
                            }

                            // Usage arrives in the last chunk when stream_options asks for it
                            if let Some(usage) = stream_resp.usage {
                                let _ = tx.send(Ok(final_chunk(Some(usage.into())))).await;
                                return;
                            }
                        }
                    }
                }
            }

            // Stream ended without [DONE]
            let _ = tx.send(Ok(final_chunk(None))).await;
        });

        Ok(rx)
    }
}

/// Remove and decode the first complete line in `buffer`.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    let line_end = buffer.iter().position(|&b| b == b'\n')?;
    let raw: Vec<u8> = buffer.drain(..=line_end).collect();
    let line = String::from_utf8_lossy(&raw[..line_end]);
    Some(line.trim_end_matches('\r').to_string())
}

fn final_chunk(usage: Option<Usage>) -> StreamChunk {
    StreamChunk {
        content: None,
        done: true,
        usage,
    }
}

/// One line of an SSE body, classified.
enum SseEvent {
    /// Blank line, comment, or a non-`data:` field
    Skip,
    /// `data: [DONE]`
    Done,
    Data(StreamResponse),
    Invalid(String),
}

fn parse_sse_line(line: &str) -> SseEvent {
    if line.is_empty() || line.starts_with(':') {
        return SseEvent::Skip;
    }

    let Some(data) = line.strip_prefix("data:") else {
        return SseEvent::Skip;
    };
    let data = data.trim();

    if data == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(resp) => SseEvent::Data(resp),
        Err(e) => SseEvent::Invalid(e.to_string()),
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<ApiUsage> for Usage {
    fn from(u: ApiUsage) -> Self {
        Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }
    }
}

// --- Embedding API types ---

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<EmbeddingApiUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingApiUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

// --- Streaming SSE types ---

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
