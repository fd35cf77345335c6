//! Attachment payload codec
//!
//! Attachments store raw bytes as standard base64. Text is UTF-8; bytes that
//! are not valid UTF-8 decode to U+FFFD rather than failing the load.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn decode(payload: &str) -> Result<String, base64::DecodeError> {
    // Some backends wrap long payloads across lines.
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
