//! RAG pattern — Retrieval-Augmented chat over an indexed collection.
//!
//! # Flow
//!
//! 1. Take the latest real user question from the session log
//! 2. Query the retriever for the `top_k` closest chunks
//! 3. Assemble context with the chunks in the system message
//! 4. Stream the reply and append it to the log
//!
//! Retrieved chunks live only in the request; the log keeps just the
//! conversation itself.

use std::sync::Arc;

use docchat_core::error::Error;
use docchat_core::message::Role;
use docchat_core::retrieval::Retriever;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::context::ContextAssembler;
use crate::followup::MORE_INFO_REQUEST;
use crate::patterns::model::ChatModel;
use crate::patterns::turn::{ChatTurn, stream_turn};
use crate::session::ChatSession;
use crate::stream_event::ChatStreamEvent;

/// System instructions for open-ended chat.
pub const RAG_INSTRUCTIONS: &str = "You are a helpful AI assistant.";

/// Token budget used when none is configured.
pub const DEFAULT_RAG_BUDGET: i64 = 3000;

/// Chunks retrieved per question when none is configured.
pub const DEFAULT_TOP_K: usize = 3;

pub struct RagChat {
    model: ChatModel,
    assembler: ContextAssembler,
    retriever: Option<Arc<dyn Retriever>>,
    top_k: usize,
    instructions: String,
}

impl RagChat {
    pub fn new(model: ChatModel, assembler: ContextAssembler) -> Self {
        Self {
            model,
            assembler,
            retriever: None,
            top_k: DEFAULT_TOP_K,
            instructions: RAG_INSTRUCTIONS.to_string(),
        }
    }

    /// Replace the system instructions (e.g. `context.system_prompt`).
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn has_retriever(&self) -> bool {
        self.retriever.is_some()
    }

    /// Record `question` and stream the answer.
    pub async fn ask(
        &self,
        session: &mut ChatSession,
        question: &str,
        events: &mpsc::Sender<ChatStreamEvent>,
    ) -> Result<ChatTurn, Error> {
        session.push_user(question);
        self.respond(session, events).await
    }

    /// Answer the last user turn already in the log.
    pub async fn respond(
        &self,
        session: &mut ChatSession,
        events: &mpsc::Sender<ChatStreamEvent>,
    ) -> Result<ChatTurn, Error> {
        let retrieved = match self.retrieve(session).await {
            Ok(chunks) => chunks,
            Err(e) => {
                let _ = events
                    .send(ChatStreamEvent::Error {
                        message: format!("Retrieval failed: {e}"),
                    })
                    .await;
                return Err(e);
            }
        };

        stream_turn(&self.model, &self.assembler, session, &self.instructions, retrieved, events).await
    }

    async fn retrieve(&self, session: &ChatSession) -> Result<Vec<String>, Error> {
        let Some(retriever) = &self.retriever else {
            return Ok(Vec::new());
        };
        let Some(query) = retrieval_query(session) else {
            return Ok(Vec::new());
        };

        info!(retriever = retriever.name(), top_k = self.top_k, "RAG: retrieving chunks");
        let chunks = retriever.query(query, self.top_k).await?;
        debug!(chunks = chunks.len(), "RAG: chunks retrieved");
        Ok(chunks)
    }
}

/// The newest user turn that is an actual question.
///
/// A "more information" follow-up carries no topic of its own, so retrieval
/// uses the question it follows.
fn retrieval_query(session: &ChatSession) -> Option<&str> {
    session
        .log()
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::User && m.content != MORE_INFO_REQUEST)
        .map(|m| m.content.as_str())
}
