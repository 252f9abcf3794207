//! Fixed-size chunking for indexing.

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Split `text` into consecutive windows of at most `chunk_size` characters.
///
/// Splits on `char` boundaries, never inside a code point. A zero
/// `chunk_size` is treated as 1.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}
