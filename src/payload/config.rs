//! # Meter Configuration
//!
//! The configuration travels as a 3-byte payload: the number of counters
//! (little-endian u16) followed by one config byte. Bits 0, 1, 4 and 5 of the
//! config byte are flags; the operating mode index sits in bits 2-3.

use crate::constants::MERCURY_CONFIG_SIZE;
use crate::error::MercuryError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Flag bits of the config byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigFlags: u8 {
        const TRANSPARENT_MODE = 0b0000_0001;
        const ZERO_THRESHOLD   = 0b0000_0010;
        const DST              = 0b0001_0000;
        const PLC_DISABLED     = 0b0010_0000;
    }
}

const MODE_SHIFT: u8 = 2;
const MODE_MASK: u8 = 0b0000_0011;

/// Operating mode of the meter's packet relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    MasterSR,
    SlaveSRT,
    SlaveSR,
}

impl Mode {
    /// All modes in wire index order.
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::MasterSR, Mode::SlaveSRT, Mode::SlaveSR];

    pub fn index(self) -> u8 {
        match self {
            Mode::Normal => 0,
            Mode::MasterSR => 1,
            Mode::SlaveSRT => 2,
            Mode::SlaveSR => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Mode> {
        Mode::ALL.get(index as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::MasterSR => "MasterSR",
            Mode::SlaveSRT => "SlaveSRT",
            Mode::SlaveSR => "SlaveSR",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = MercuryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MercuryError::InvalidMode(s.to_string()))
    }
}

/// Decoded meter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub counters: u16,
    pub transparent_mode: bool,
    pub zero_threshold: bool,
    pub mode: Mode,
    pub dst: bool,
    pub plc_disabled: bool,
}

impl Config {
    /// Builds the config byte from the flag fields and the mode.
    pub fn to_byte(&self) -> u8 {
        let mut flags = ConfigFlags::empty();
        flags.set(ConfigFlags::TRANSPARENT_MODE, self.transparent_mode);
        flags.set(ConfigFlags::ZERO_THRESHOLD, self.zero_threshold);
        flags.set(ConfigFlags::DST, self.dst);
        flags.set(ConfigFlags::PLC_DISABLED, self.plc_disabled);
        flags.bits() | (self.mode.index() << MODE_SHIFT)
    }

    /// Splits a config byte into its fields. Bits 6-7 are ignored.
    pub fn from_byte(counters: u16, byte: u8) -> Config {
        let flags = ConfigFlags::from_bits_truncate(byte);
        let mode = Mode::ALL[((byte >> MODE_SHIFT) & MODE_MASK) as usize];
        Config {
            counters,
            transparent_mode: flags.contains(ConfigFlags::TRANSPARENT_MODE),
            zero_threshold: flags.contains(ConfigFlags::ZERO_THRESHOLD),
            mode,
            dst: flags.contains(ConfigFlags::DST),
            plc_disabled: flags.contains(ConfigFlags::PLC_DISABLED),
        }
    }

    /// Serializes to the 3-byte wire payload `counters:LE16, config:u8`.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(MERCURY_CONFIG_SIZE);
        data.extend_from_slice(&self.counters.to_le_bytes());
        data.push(self.to_byte());
        data
    }

    /// Parses the 3-byte wire payload.
    pub fn decode(data: &[u8]) -> Result<Config, MercuryError> {
        match data {
            [lo, hi, byte] => Ok(Config::from_byte(u16::from_le_bytes([*lo, *hi]), *byte)),
            _ => Err(MercuryError::DecodeError(format!(
                "incorrect config length: expected {}, got {}",
                MERCURY_CONFIG_SIZE,
                data.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_flags() {
        // transparent + dst + mode SlaveSRT
        let config = Config::decode(&[0x04, 0x00, 0b0001_1001]).unwrap();
        assert_eq!(config.counters, 4);
        assert!(config.transparent_mode);
        assert!(!config.zero_threshold);
        assert_eq!(config.mode, Mode::SlaveSRT);
        assert!(config.dst);
        assert!(!config.plc_disabled);
    }

    #[test]
    fn test_decode_wrong_length() {
        assert!(matches!(
            Config::decode(&[0x01, 0x00]),
            Err(MercuryError::DecodeError(_))
        ));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!("slavesr".parse::<Mode>().unwrap(), Mode::SlaveSR);
        assert_eq!(Mode::MasterSR.to_string(), "MasterSR");
        assert_eq!(Mode::from_index(2), Some(Mode::SlaveSRT));
        assert_eq!(Mode::from_index(4), None);
        assert!(matches!("Turbo".parse::<Mode>(), Err(MercuryError::InvalidMode(_))));
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let config = Config::from_byte(1, 0b1100_0000);
        assert_eq!(config.mode, Mode::Normal);
        assert_eq!(config.to_byte(), 0);
    }
}
