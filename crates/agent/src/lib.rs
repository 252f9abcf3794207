//! Conversation engine for DocChat.
//!
//! Every chat request follows the same path:
//!
//! 1. **Record** the user's turn in the [`ChatSession`] log
//! 2. **Retrieve** document context, if the workflow has any
//! 3. **Assemble** a bounded context: system message + newest history that fits the budget
//! 4. **Stream** the reply from the provider as [`ChatStreamEvent`]s
//! 5. **Record** the reply in the log
//!
//! The interactive "want more information?" loop on top of this is the
//! [`FollowUp`] state machine.

pub mod context;
pub mod followup;
pub mod patterns;
pub mod session;
pub mod stream_event;

pub use context::{
    AssembledContext, AssemblyInput, AssemblyMetadata, ContextAssembler, TokenCounter, assemble,
    counter_from_config, retrieved_context_from,
};
pub use followup::{FollowUp, FollowUpAction, FollowUpEvent, FollowUpState};
pub use patterns::{ChatModel, ChatTurn, DocumentQa, RagChat, Summarizer, Summary, SummaryFormat};
pub use session::{ChatSession, SessionSummary};
pub use stream_event::{ChatStreamEvent, CollectedStream, collect_stream};
