//! # DocChat Core
//!
//! Domain types, collaborator traits, and error definitions for DocChat.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completions API, retrieval service, secret
//! store) is defined as a trait here. Implementations live in their
//! respective crates, so tests can swap in scripted stand-ins and the
//! dependency graph points inward on core.

pub mod error;
pub mod message;
pub mod provider;
pub mod retrieval;
pub mod secrets;

// Re-export key types at crate root for ergonomics
pub use error::{DocumentError, Error, MemoryError, ProviderError, Result};
pub use message::{ConversationId, ConversationLog, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
pub use retrieval::Retriever;
pub use secrets::SecretStore;
