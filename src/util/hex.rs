//! # Hex Encoding/Decoding Utilities
//!
//! Hex helpers used for frame dumps in the logs and for building test frames
//! from captured traffic.
//!
//! ```rust
//! use mercury_rs::util::hex::{decode_hex, dump_hex, encode_hex};
//!
//! let frame = [0x63, 0xE0, 0xA7, 0xFF];
//! assert_eq!(encode_hex(&frame), "63e0a7ff");
//! assert_eq!(dump_hex(&frame), "63 e0 a7 ff");
//! assert_eq!(decode_hex("63 e0 a7 ff").unwrap(), frame);
//! ```

use thiserror::Error;

/// Errors that can occur during hex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex characters: {0}")]
    OddLength(usize),

    #[error("Empty hex string")]
    EmptyString,

    #[error("Hex decoding error: {0}")]
    DecodeError(String),
}

/// Encode bytes to lowercase hex string
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode hex string to bytes
///
/// Accepts both uppercase and lowercase hex characters.
/// Whitespace is automatically stripped.
pub fn decode_hex(hex_str: &str) -> Result<Vec<u8>, HexError> {
    let cleaned: String = hex_str.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(HexError::EmptyString);
    }

    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength(cleaned.len()));
    }

    hex::decode(&cleaned).map_err(|e| HexError::DecodeError(e.to_string()))
}

/// Formats data as "63 e0 a7" for frame logging.
pub fn dump_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
