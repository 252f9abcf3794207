//! Shared test helpers for workflow tests.

use docchat_core::error::{MemoryError, ProviderError};
use docchat_core::message::Message;
use docchat_core::provider::{
    Provider, ProviderRequest, ProviderResponse, StreamChunk, StreamReceiver, Usage,
};
use docchat_core::retrieval::Retriever;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` or `stream` returns the next response in the
/// queue and records the request. Streams deliver the text word by word.
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| make_text_response(t)).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: ProviderRequest) -> ProviderResponse {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let call = requests.len();
        if call >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                call,
                responses.len()
            );
        }
        requests.push(request);
        responses[call].clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Ok(self.next(request))
    }

    async fn stream(&self, request: ProviderRequest) -> Result<StreamReceiver, ProviderError> {
        let response = self.next(request);
        let words: Vec<String> = response
            .message
            .content
            .split_inclusive(' ')
            .map(String::from)
            .collect();

        let (tx, rx) = tokio::sync::mpsc::channel(words.len() + 1);
        for word in words {
            let _ = tx
                .send(Ok(StreamChunk {
                    content: Some(word),
                    done: false,
                    usage: None,
                }))
                .await;
        }
        let _ = tx
            .send(Ok(StreamChunk {
                content: None,
                done: true,
                usage: response.usage,
            }))
            .await;
        Ok(rx)
    }
}

/// A provider whose credential is always rejected.
pub struct RejectingProvider;

#[async_trait::async_trait]
impl Provider for RejectingProvider {
    fn name(&self) -> &str {
        "rejecting"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::AuthenticationFailed("Invalid API key".into()))
    }
}

/// Returns fixed chunks and records the queries it saw.
pub struct StaticRetriever {
    chunks: Vec<String>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticRetriever {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &str {
        "static"
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<String>, MemoryError> {
        self.queries.lock().unwrap().push((text.to_string(), top_k));
        Ok(self.chunks.iter().take(top_k).cloned().collect())
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}
