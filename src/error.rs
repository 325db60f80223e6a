//! # Mercury Error Handling
//!
//! This module defines the MercuryError enum, which represents every reason an
//! exchange with a meter can fail. Callers treat any variant as "this exchange
//! failed"; no partial results are ever returned alongside an error.

use crate::mercury::transport::TransportError;
use thiserror::Error;

/// Represents the different error types that can occur in the Mercury crate.
#[derive(Debug, Error)]
pub enum MercuryError {
    /// The CRC-24 over the response header does not match.
    #[error("Incorrect CRC in response: expected 0x{expected:06X}, calculated 0x{calculated:06X}")]
    CrcMismatch { expected: u32, calculated: u32 },

    /// The payload checksum does not match.
    #[error("Incorrect checksum in response: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// The response came from (or answers for) something other than what was addressed.
    #[error("Address mismatch: {0}")]
    AddressMismatch(String),

    /// A read stage returned the wrong number of bytes, or a payload has a bad shape.
    #[error("Framing error: {0}")]
    FramingError(String),

    /// The response code or payload length does not fit the command.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Nothing at all was received from the addressed device.
    #[error("No response from device 0x{0:04X}")]
    NoResponse(u16),

    /// Every receive attempt yielded a response from a foreign source.
    #[error("Receive tries limit reached after {0} attempts")]
    RetryLimitExceeded(usize),

    /// The transport collaborator failed.
    #[error("Transport fault: {0}")]
    TransportFault(#[from] TransportError),

    /// A mode name that is not one of the four known modes.
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
}
