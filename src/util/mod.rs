//! # Utility Modules
//!
//! Helpers shared across the crate that are not part of the protocol itself.

pub mod hex;

pub use hex::{decode_hex, dump_hex, encode_hex, HexError};
