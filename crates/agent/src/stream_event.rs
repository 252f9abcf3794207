//! Chat-level streaming events.
//!
//! `ChatStreamEvent` wraps provider-level stream chunks into the events a
//! front end renders: text fragments as they arrive, then a final `done`
//! carrying token accounting, or an `error`.

use docchat_core::error::ProviderError;
use docchat_core::provider::{StreamReceiver, Usage};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted while a reply streams.
///
/// - `chunk` — partial text from the model
/// - `done`  — the reply is complete
/// - `error` — the request failed mid-stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    /// Partial text from the model.
    Chunk { content: String },

    /// The stream is complete — final metadata.
    Done {
        conversation_id: String,
        usage: Option<Usage>,
        /// Whether older history was left out of the request.
        truncated: bool,
        /// Prompt tokens counted by the assembler.
        total_tokens: usize,
    },

    /// An error occurred mid-stream.
    Error { message: String },
}

impl ChatStreamEvent {
    /// Event name, as used for SSE `event:` lines.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

/// Forward a provider stream as `Chunk` events and return the full text.
///
/// A dropped event receiver does not stop accumulation: the reply still
/// has to land in the session log.
pub async fn relay_stream(
    mut provider_rx: StreamReceiver,
    events: &mpsc::Sender<ChatStreamEvent>,
) -> Result<(String, Option<Usage>), ProviderError> {
    let mut full_content = String::new();
    let mut usage = None;

    while let Some(chunk_result) = provider_rx.recv().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = events
                    .send(ChatStreamEvent::Error {
                        message: format!("Stream error: {e}"),
                    })
                    .await;
                return Err(e);
            }
        };

        if let Some(text) = chunk.content
            && !text.is_empty()
        {
            full_content.push_str(&text);
            let _ = events.send(ChatStreamEvent::Chunk { content: text }).await;
        }

        if chunk.usage.is_some() {
            usage = chunk.usage;
        }

        if chunk.done {
            break;
        }
    }

    Ok((full_content, usage))
}

/// Everything a finished stream carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedStream {
    pub text: String,
    pub truncated: bool,
    pub total_tokens: usize,
    pub usage: Option<Usage>,
    pub error: Option<String>,
}

/// Drain an event channel, concatenating chunk fragments.
pub async fn collect_stream(mut rx: mpsc::Receiver<ChatStreamEvent>) -> CollectedStream {
    let mut collected = CollectedStream::default();

    while let Some(event) = rx.recv().await {
        match event {
            ChatStreamEvent::Chunk { content } => collected.text.push_str(&content),
            ChatStreamEvent::Done {
                usage,
                truncated,
                total_tokens,
                ..
            } => {
                collected.usage = usage;
                collected.truncated = truncated;
                collected.total_tokens = total_tokens;
            }
            ChatStreamEvent::Error { message } => collected.error = Some(message),
        }
    }

    collected
}
