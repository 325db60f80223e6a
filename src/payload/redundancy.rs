//! # Counter Value Reconstruction
//!
//! Counter readings are transmitted as a 16-bit base, an 8-bit increment and a
//! companion check byte. The increment is only trusted when the pair
//! `(check, inc)` matches the entry for `inc` in a fixed 256-entry code table.
//! This is independent of the frame checksum and protects one field inside an
//! already validated payload.

/// Code table indexed by the increment byte. The low byte of every entry equals
/// its index; the high byte is the expected check byte.
pub static REDUNDANCY_TABLE: [u16; 256] = [
    0x0000, 0xD401, 0xA902, 0x7D03, 0x5304, 0x8705, 0xFA06, 0x2E07,
    0xA608, 0x7209, 0x0F0A, 0xDB0B, 0xF50C, 0x210D, 0x5C0E, 0x880F,
    0x4D10, 0x9911, 0xE412, 0x3013, 0x1E14, 0xCA15, 0xB716, 0x6317,
    0xEB18, 0x3F19, 0x421A, 0x961B, 0xB81C, 0x6C1D, 0x111E, 0xC51F,
    0x9A20, 0x4E21, 0x3322, 0xE723, 0xC924, 0x1D25, 0x6026, 0xB427,
    0x3C28, 0xE829, 0x952A, 0x412B, 0x6F2C, 0xBB2D, 0xC62E, 0x122F,
    0xD730, 0x0331, 0x7E32, 0xAA33, 0x8434, 0x5035, 0x2D36, 0xF937,
    0x7138, 0xA539, 0xD83A, 0x0C3B, 0x223C, 0xF63D, 0x8B3E, 0x5F3F,
    0x3540, 0xE141, 0x9C42, 0x4843, 0x6644, 0xB245, 0xCF46, 0x1B47,
    0x9348, 0x4749, 0x3A4A, 0xEE4B, 0xC04C, 0x144D, 0x694E, 0xBD4F,
    0x7850, 0xAC51, 0xD152, 0x0553, 0x2B54, 0xFF55, 0x8256, 0x5657,
    0xDE58, 0x0A59, 0x775A, 0xA35B, 0x8D5C, 0x595D, 0x245E, 0xF05F,
    0xAF60, 0x7B61, 0x0662, 0xD263, 0xFC64, 0x2865, 0x5566, 0x8167,
    0x0968, 0xDD69, 0xA06A, 0x746B, 0x5A6C, 0x8E6D, 0xF36E, 0x276F,
    0xE270, 0x3671, 0x4B72, 0x9F73, 0xB174, 0x6575, 0x1876, 0xCC77,
    0x4478, 0x9079, 0xED7A, 0x397B, 0x177C, 0xC37D, 0xBE7E, 0x6A7F,
    0x6A80, 0xBE81, 0xC382, 0x1783, 0x3984, 0xED85, 0x9086, 0x4487,
    0xCC88, 0x1889, 0x658A, 0xB18B, 0x9F8C, 0x4B8D, 0x368E, 0xE28F,
    0x2790, 0xF391, 0x8E92, 0x5A93, 0x7494, 0xA095, 0xDD96, 0x0997,
    0x8198, 0x5599, 0x289A, 0xFC9B, 0xD29C, 0x069D, 0x7B9E, 0xAF9F,
    0xF0A0, 0x24A1, 0x59A2, 0x8DA3, 0xA3A4, 0x77A5, 0x0AA6, 0xDEA7,
    0x56A8, 0x82A9, 0xFFAA, 0x2BAB, 0x05AC, 0xD1AD, 0xACAE, 0x78AF,
    0xBDB0, 0x69B1, 0x14B2, 0xC0B3, 0xEEB4, 0x3AB5, 0x47B6, 0x93B7,
    0x1BB8, 0xCFB9, 0xB2BA, 0x66BB, 0x48BC, 0x9CBD, 0xE1BE, 0x35BF,
    0x5FC0, 0x8BC1, 0xF6C2, 0x22C3, 0x0CC4, 0xD8C5, 0xA5C6, 0x71C7,
    0xF9C8, 0x2DC9, 0x50CA, 0x84CB, 0xAACC, 0x7ECD, 0x03CE, 0xD7CF,
    0x12D0, 0xC6D1, 0xBBD2, 0x6FD3, 0x41D4, 0x95D5, 0xE8D6, 0x3CD7,
    0xB4D8, 0x60D9, 0x1DDA, 0xC9DB, 0xE7DC, 0x33DD, 0x4EDE, 0x9ADF,
    0xC5E0, 0x11E1, 0x6CE2, 0xB8E3, 0x96E4, 0x42E5, 0x3FE6, 0xEBE7,
    0x63E8, 0xB7E9, 0xCAEA, 0x1EEB, 0x30EC, 0xE4ED, 0x99EE, 0x4DEF,
    0x88F0, 0x5CF1, 0x21F2, 0xF5F3, 0xDBF4, 0x0FF5, 0x72F6, 0xA6F7,
    0x2EF8, 0xFAF9, 0x87FA, 0x53FB, 0x7DFC, 0xA9FD, 0xD4FE, 0x00FF,
];

/// Returns the check byte a sender must transmit alongside `inc`.
pub fn check_byte(inc: u8) -> u8 {
    (REDUNDANCY_TABLE[inc as usize] >> 8) as u8
}

/// Restores a counter value from its base, increment and check byte.
///
/// Returns `None` when the check byte does not match the table entry for `inc`.
pub fn reconstruct(base: u16, inc: u8, check: u8) -> Option<u32> {
    let expected = ((check as u16) << 8) | inc as u16;
    if REDUNDANCY_TABLE[inc as usize] == expected {
        Some(base as u32 + inc as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_low_byte_is_index() {
        for (i, entry) in REDUNDANCY_TABLE.iter().enumerate() {
            assert_eq!((entry & 0xFF) as usize, i);
        }
    }

    #[test]
    fn test_reconstruct_valid() {
        assert_eq!(reconstruct(1000, 5, 0x87), Some(1005));
        assert_eq!(reconstruct(0, 0, 0x00), Some(0));
        assert_eq!(reconstruct(0xFFFF, 0xFF, 0x00), Some(0x100FE));
    }

    #[test]
    fn test_reconstruct_corrupted() {
        assert_eq!(reconstruct(1000, 5, 0x86), None);
        assert_eq!(reconstruct(1000, 1, 0x00), None);
    }

    #[test]
    fn test_check_byte_matches_table() {
        assert_eq!(check_byte(1), 0xD4);
        assert_eq!(check_byte(0x80), 0x6A);
    }
}
