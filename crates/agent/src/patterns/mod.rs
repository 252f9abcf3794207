//! Chat workflows.
//!
//! 1. **Summarize** — one-shot summary of a document in a chosen shape
//! 2. **Document Q&A** — questions answered from one attached document
//! 3. **RAG chat** — open chat grounded in chunks from an indexed collection
//!
//! The two conversational workflows share one turn shape: assemble a
//! bounded context, stream the reply, append it to the session log.

pub mod document_qa;
pub mod model;
pub mod rag;
pub mod summarize;
pub mod turn;

pub use document_qa::DocumentQa;
pub use model::ChatModel;
pub use rag::RagChat;
pub use summarize::{Summarizer, Summary, SummaryFormat};
pub use turn::ChatTurn;

#[cfg(test)]
pub(crate) mod test_helpers;
