//! Document loading for DocChat.
//!
//! Turns user-supplied files into plain text: kind detection, text decoding
//! with a single Latin-1 fallback, PDF extraction, and fixed-size chunking
//! for indexing.

pub mod chunk;
pub mod decode;
pub mod extract;
pub mod kind;

pub use chunk::{DEFAULT_CHUNK_SIZE, chunk_text};
pub use decode::decode_text;
pub use extract::{LoadedDocument, extract_bytes, extract_text, list_pdfs, load_document};
pub use kind::DocumentKind;
