//! # Mercury Integrity Primitives
//!
//! Two integrity values protect every frame:
//!
//! - a CRC-24 over the 5 header bytes (`src`, `dst`, `length`), which is the
//!   OpenPGP CRC-24 (poly `0x864CFB`, init `0xB704CE`, no reflection), and
//! - an 8-bit sum over the payload, biased by `-1`. The bias is what the meter
//!   firmware computes and must not be dropped.

use crc::{Crc, CRC_24_OPENPGP};

const CRC24: Crc<u32> = Crc::<u32>::new(&CRC_24_OPENPGP);

/// Calculates the 24-bit header CRC. Only the low 24 bits are ever set.
pub fn crc24(data: &[u8]) -> u32 {
    CRC24.checksum(data) & 0x00FF_FFFF
}

/// Serializes a CRC-24 the way it goes on the wire: 3 bytes, little-endian.
pub fn crc24_bytes(crc: u32) -> [u8; 3] {
    let le = crc.to_le_bytes();
    [le[0], le[1], le[2]]
}

/// Reads a wire CRC-24 back into an integer.
pub fn crc24_from_bytes(bytes: [u8; 3]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}

/// Calculates the payload checksum: byte sum minus one, modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b))
        .wrapping_sub(1)
}
