//! Bounded context assembly.
//!
//! Every request sends one system message plus as much recent history as
//! the token budget allows. Older turns are dropped first; the newest
//! message always survives.
//!
//! | Piece | Source | Trim strategy |
//! |-------|--------|---------------|
//! | System message | Workflow instructions + retrieved context | Never trimmed |
//! | Conversation history | Session log | Oldest turns dropped |

pub mod assembler;
pub mod token;

pub use assembler::{
    AssembledContext, AssemblyInput, AssemblyMetadata, ContextAssembler, assemble,
    retrieved_context_from,
};
pub use token::{ApproximateCounter, TokenCounter, counter_from_config, estimate_tokens};

#[cfg(feature = "model-tokenizer")]
pub use token::ModelTokenizer;
