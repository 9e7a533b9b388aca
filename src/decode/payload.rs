// src/decode/payload.rs
// =============================================================================
// Turns the payload of the contents API back into text.
//
// GitHub sends file bodies base64-encoded, wrapped at 60 characters with
// "\n" between chunks. The line breaks are not part of the base64 alphabet,
// so they are removed before decoding.
// =============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::github::FileContent;

// Why a file's contribution had to be dropped
//
// None of these stop the run: the caller logs a warning and moves on.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// GitHub only inlines files up to 1 MB; bigger ones come back with encoding "none"
    #[error("file content was not inlined by the API (too large)")]
    NotInlined,

    #[error("unsupported content encoding {0:?}")]
    UnsupportedEncoding(String),
}

pub fn decode_payload(file: &FileContent) -> Result<String, DecodeError> {
    match file.encoding.as_str() {
        "base64" => {
            let compact: String = file
                .content
                .chars()
                .filter(|c| !matches!(c, '\n' | '\r'))
                .collect();
            let bytes = STANDARD.decode(compact.as_bytes())?;
            // Not every ignore file is UTF-8 (Latin-1 is common); bad bytes
            // become U+FFFD and the rest of the file still counts
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "" | "utf-8" | "utf8" => Ok(file.content.clone()),
        "none" => Err(DecodeError::NotInlined),
        other => Err(DecodeError::UnsupportedEncoding(other.to_string())),
    }
}
