//! Inbound transcoding of source buffers into UTF-8 text.
//!
//! The core parses decoded text only; all spans in the result tree refer to
//! the decoded buffer. Supported encodings are UTF-8 (validated, zero-copy)
//! and the Windows-1252 legacy code page (transcoded via `encoding_rs`).

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The declared encoding is not one the parser supports. Checked before
    /// any parsing happens; no tree is produced.
    #[error("unsupported encoding: {0}")]
    Unsupported(String),

    /// The buffer was declared UTF-8 but is not valid UTF-8.
    #[error("invalid UTF-8 encoding at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Decode `src` according to the declared encoding name (case-insensitive).
pub fn decode<'a>(src: &'a [u8], encoding: &str) -> Result<Cow<'a, str>, DecodeError> {
    match encoding.to_ascii_uppercase().as_str() {
        "UTF-8" => match std::str::from_utf8(src) {
            Ok(text) => Ok(Cow::Borrowed(text)),
            Err(e) => Err(DecodeError::InvalidUtf8 {
                valid_up_to: e.valid_up_to(),
            }),
        },
        "WINDOWS-1252" => {
            let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(src);
            Ok(text)
        }
        _ => Err(DecodeError::Unsupported(encoding.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passthrough_is_borrowed() {
        let src = "package main\n".as_bytes();
        let text = decode(src, "utf-8").unwrap();
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "package main\n");
    }

    #[test]
    fn windows_1252_transcodes_high_bytes() {
        // 0xE9 is 'é' in Windows-1252
        let src = b"// caf\xe9\npackage main\n";
        let text = decode(src, "Windows-1252").unwrap();
        assert_eq!(&*text, "// café\npackage main\n");
    }

    #[test]
    fn unsupported_encoding_rejected() {
        let err = decode(b"package main\n", "ISO-8859-1").unwrap_err();
        assert_eq!(err, DecodeError::Unsupported("ISO-8859-1".to_string()));
    }

    #[test]
    fn invalid_utf8_reported_with_offset() {
        let err = decode(b"package\xff main\n", "UTF-8").unwrap_err();
        assert_eq!(err, DecodeError::InvalidUtf8 { valid_up_to: 7 });
    }
}
