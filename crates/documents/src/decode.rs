//! Text decoding: UTF-8 first, then exactly one fallback (Latin-1).

use docchat_core::error::DocumentError;
use tracing::debug;

/// Decode raw bytes as text.
///
/// Latin-1 maps every byte to a code point, so the fallback only rejects
/// input that is clearly binary (contains NUL bytes). `name` is used in the
/// error message.
pub fn decode_text(bytes: &[u8], name: &str) -> Result<String, DocumentError> {
    if bytes.contains(&0) {
        return Err(DocumentError::Decoding { name: name.into() });
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string()),
        Err(_) => {
            debug!(name, "Not valid UTF-8, falling back to Latin-1");
            Ok(decode_latin1(bytes))
        }
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough() {
        let text = decode_text("héllo wörld".as_bytes(), "a.txt").unwrap();
        assert_eq!(text, "héllo wörld");
    }

    #[test]
    fn byte_order_mark_stripped() {
        let text = decode_text(b"\xEF\xBB\xBFhello", "bom.txt").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn latin1_fallback() {
        // "café" in ISO-8859-1
        let text = decode_text(b"caf\xE9", "menu.txt").unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn binary_input_rejected() {
        let err = decode_text(b"\x89PNG\r\n\x1a\n\x00\x00", "image.txt").unwrap_err();
        match err {
            DocumentError::Decoding { name } => assert_eq!(name, "image.txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(decode_text(b"", "empty.txt").unwrap(), "");
    }
}
