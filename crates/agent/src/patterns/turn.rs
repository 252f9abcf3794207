//! One streamed chat turn: assemble, stream, record.

use crate::context::{AssemblyInput, AssemblyMetadata, ContextAssembler};
use crate::patterns::model::ChatModel;
use crate::session::ChatSession;
use crate::stream_event::ChatStreamEvent;
use docchat_core::error::Error;
use docchat_core::provider::Usage;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Result of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The full assistant reply (already appended to the session log).
    pub answer: String,
    /// Whether older history was left out of the request.
    pub truncated: bool,
    pub metadata: AssemblyMetadata,
    /// Retrieved chunks injected into the system message, in rank order.
    pub retrieved: Vec<String>,
    pub usage: Option<Usage>,
}

/// Send the session log under `instructions` and record the reply.
///
/// The log is expected to end with the user turn being answered. On failure
/// the log is left as it was.
pub(crate) async fn stream_turn(
    model: &ChatModel,
    assembler: &ContextAssembler,
    session: &mut ChatSession,
    instructions: &str,
    retrieved: Vec<String>,
    events: &mpsc::Sender<ChatStreamEvent>,
) -> Result<ChatTurn, Error> {
    let retrieved_context = crate::context::retrieved_context_from(&retrieved);
    let assembled = match assembler.assemble(&AssemblyInput {
        log: session.log().messages(),
        instructions,
        retrieved_context: retrieved_context.as_deref(),
    }) {
        Ok(a) => a,
        Err(e) => {
            let _ = events
                .send(ChatStreamEvent::Error {
                    message: format!("Context assembly failed: {e}"),
                })
                .await;
            return Err(e);
        }
    };

    if assembled.truncated {
        warn!(
            dropped = assembled.metadata.messages_dropped,
            budget = assembled.metadata.budget,
            "Conversation history truncated to fit the token budget"
        );
    }
    info!(
        session = %session.id(),
        total_tokens = assembled.metadata.total_tokens,
        messages = assembled.messages.len(),
        retrieved = retrieved.len(),
        "Sending chat request"
    );

    let (answer, usage) = model.stream(assembled.messages, events).await?;
    session.push_assistant(answer.clone());

    let _ = events
        .send(ChatStreamEvent::Done {
            conversation_id: session.id().to_string(),
            usage: usage.clone(),
            truncated: assembled.truncated,
            total_tokens: assembled.metadata.total_tokens,
        })
        .await;

    Ok(ChatTurn {
        answer,
        truncated: assembled.truncated,
        metadata: assembled.metadata,
        retrieved,
        usage,
    })
}
