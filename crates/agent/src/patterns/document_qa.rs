//! Document Q&A pattern — chat about one attached document.
//!
//! Without a document the assistant answers questions about the app itself.
//! Once a document is attached, its full text is sent as context with every
//! question and the model is told to answer only from it.

use crate::context::ContextAssembler;
use crate::patterns::model::ChatModel;
use crate::patterns::turn::{ChatTurn, stream_turn};
use crate::session::ChatSession;
use crate::stream_event::ChatStreamEvent;
use docchat_core::error::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Instructions used before any document is attached.
pub const APP_HELP_INSTRUCTIONS: &str = "You are a helpful AI assistant for a document Q&A app.";

/// Instructions used once a document is attached.
pub const DOCUMENT_INSTRUCTIONS: &str = "Answer the question based on the context below, and if the question can't be answered based on the context, say \"I don't know\"";

pub struct DocumentQa {
    model: ChatModel,
    assembler: ContextAssembler,
}

impl DocumentQa {
    pub fn new(model: ChatModel, assembler: ContextAssembler) -> Self {
        Self { model, assembler }
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
        let (instructions, context) = match session.document() {
            Some(document) => {
                debug!(document = %document.name, "Answering from attached document");
                (DOCUMENT_INSTRUCTIONS, vec![document.text.clone()])
            }
            None => (APP_HELP_INSTRUCTIONS, Vec::new()),
        };

        stream_turn(&self.model, &self.assembler, session, instructions, context, events).await
    }
}
