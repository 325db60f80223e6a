//! Mercury Protocol Constants
//!
//! Addresses, command codes and framing sizes shared by the codec and the session.

// ----------------------------------------------------------------------------
// Addressing
// ----------------------------------------------------------------------------

/// Destination sentinel meaning "any device may respond"; triggers discovery.
pub const MERCURY_ADDRESS_BROADCAST: u16 = 0x2FFF;

/// Exclusive lower bound of addresses a device may be discovered at.
pub const MERCURY_ADDRESS_DISCOVERY_LOW: u16 = 0x2F00;

/// Exclusive upper bound of addresses a device may be discovered at.
pub const MERCURY_ADDRESS_DISCOVERY_HIGH: u16 = 0x2FFF;

/// Source address used by the master unless configured otherwise.
pub const MERCURY_ADDRESS_MASTER: u16 = 0xFFFF;

// ----------------------------------------------------------------------------
// Command codes
// ----------------------------------------------------------------------------

pub const MERCURY_CMD_SET_CONFIG: u8 = 0x00;
pub const MERCURY_CMD_GET_CONFIG: u8 = 0x80;
pub const MERCURY_CMD_GET_LAST_PACKET: u8 = 0x82;
pub const MERCURY_CMD_GET_HISTORY: u8 = 0x85;
pub const MERCURY_CMD_GET_NETWORK_ID: u8 = 0x86;

// ----------------------------------------------------------------------------
// Framing
// ----------------------------------------------------------------------------

/// crc24[3] + src[2] + dst[2] + length[1]
pub const MERCURY_HEADER_SIZE: usize = 8;

/// Size of the CRC-24 field on the wire.
pub const MERCURY_CRC_SIZE: usize = 3;

/// Largest data field a frame can carry: the length byte also counts the code.
pub const MERCURY_MAX_DATA_SIZE: usize = 254;

/// Receive attempts per exchange before giving up on foreign traffic.
pub const MERCURY_RECEIVE_ATTEMPTS: usize = 5;

/// Size of a GetLastPacket response payload.
pub const MERCURY_LAST_PACKET_SIZE: usize = 13;

/// Size of one GetHistory record.
pub const MERCURY_HISTORY_RECORD_SIZE: usize = 11;

/// Size of a GetConfig response payload.
pub const MERCURY_CONFIG_SIZE: usize = 3;
