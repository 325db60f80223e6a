//! # Mercury Command Catalog
//!
//! Every command kind fixes a request code, knows how to build its request data
//! and how to decode the response payload. A [`Transaction`] binds one command
//! to the addresses of a single request/response exchange.

use crate::constants::{
    MERCURY_ADDRESS_BROADCAST, MERCURY_CMD_GET_CONFIG, MERCURY_CMD_GET_HISTORY,
    MERCURY_CMD_GET_LAST_PACKET, MERCURY_CMD_GET_NETWORK_ID, MERCURY_CMD_SET_CONFIG,
};
use crate::error::MercuryError;
use crate::mercury::frame::{verify_frame, Frame};
use crate::payload::config::Config;
use crate::payload::record::{decode_history, decode_last_packet, HistoryRecord};

/// A request kind understood by the meter.
pub trait Command {
    /// Decoded result of a successful exchange.
    type Output;

    /// Request code byte.
    fn code(&self) -> u8;

    /// Request data following the code byte.
    fn request_data(&self) -> Vec<u8>;

    /// Decodes the response code and payload.
    fn decode(&self, code: u8, data: &[u8]) -> Result<Self::Output, MercuryError>;
}

fn expect_code(expected: u8, actual: u8) -> Result<(), MercuryError> {
    if expected != actual {
        return Err(MercuryError::DecodeError(format!(
            "incorrect response code: expected 0x{expected:02X}, got 0x{actual:02X}"
        )));
    }
    Ok(())
}

/// Reads the meter's own network address.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetNetworkId;

impl Command for GetNetworkId {
    type Output = u16;

    fn code(&self) -> u8 {
        MERCURY_CMD_GET_NETWORK_ID
    }

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode(&self, code: u8, data: &[u8]) -> Result<u16, MercuryError> {
        expect_code(MERCURY_CMD_GET_NETWORK_ID, code)?;
        match data {
            [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
            _ => Err(MercuryError::DecodeError(format!(
                "incorrect address length: expected 2, got {}",
                data.len()
            ))),
        }
    }
}

/// Reads the meter configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetConfig;

fn decode_config(code: u8, data: &[u8]) -> Result<Config, MercuryError> {
    expect_code(MERCURY_CMD_GET_CONFIG, code)?;
    Config::decode(data)
}

impl Command for GetConfig {
    type Output = Config;

    fn code(&self) -> u8 {
        MERCURY_CMD_GET_CONFIG
    }

    fn request_data(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode(&self, code: u8, data: &[u8]) -> Result<Config, MercuryError> {
        decode_config(code, data)
    }
}

/// Writes the meter configuration. The acknowledgement is decoded like a
/// GetConfig response.
#[derive(Debug, Clone, Copy)]
pub struct SetConfig {
    pub config: Config,
}

impl SetConfig {
    pub fn new(config: Config) -> Self {
        SetConfig { config }
    }
}

impl Command for SetConfig {
    type Output = Config;

    fn code(&self) -> u8 {
        MERCURY_CMD_SET_CONFIG
    }

    fn request_data(&self) -> Vec<u8> {
        self.config.encode()
    }

    fn decode(&self, code: u8, data: &[u8]) -> Result<Config, MercuryError> {
        decode_config(code, data)
    }
}

/// Reads the most recent packet of one counter.
#[derive(Debug, Clone, Copy)]
pub struct GetLastPacket {
    pub counter: u16,
}

impl GetLastPacket {
    pub fn new(counter: u16) -> Self {
        GetLastPacket { counter }
    }
}

impl Command for GetLastPacket {
    type Output = Option<HistoryRecord>;

    fn code(&self) -> u8 {
        MERCURY_CMD_GET_LAST_PACKET
    }

    fn request_data(&self) -> Vec<u8> {
        self.counter.to_le_bytes().to_vec()
    }

    fn decode(&self, code: u8, data: &[u8]) -> Result<Option<HistoryRecord>, MercuryError> {
        expect_code(MERCURY_CMD_GET_LAST_PACKET, code)?;
        decode_last_packet(data)
    }
}

/// Reads the stored history of one counter.
#[derive(Debug, Clone, Copy)]
pub struct GetHistory {
    pub counter: u16,
}

impl GetHistory {
    pub fn new(counter: u16) -> Self {
        GetHistory { counter }
    }
}

impl Command for GetHistory {
    type Output = Vec<HistoryRecord>;

    fn code(&self) -> u8 {
        MERCURY_CMD_GET_HISTORY
    }

    fn request_data(&self) -> Vec<u8> {
        self.counter.to_le_bytes().to_vec()
    }

    fn decode(&self, code: u8, data: &[u8]) -> Result<Vec<HistoryRecord>, MercuryError> {
        expect_code(MERCURY_CMD_GET_HISTORY, code)?;
        decode_history(self.counter, data)
    }
}

/// One command addressed for a single exchange.
///
/// Addresses are fixed at construction; after an accepted response they are
/// swapped so that the responder becomes the destination.
#[derive(Debug)]
pub struct Transaction<C: Command> {
    command: C,
    source: u16,
    destination: u16,
    response: Option<(u8, Vec<u8>)>,
}

impl<C: Command> Transaction<C> {
    pub fn new(command: C, source: u16, destination: u16) -> Self {
        Transaction {
            command,
            source,
            destination,
            response: None,
        }
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn source(&self) -> u16 {
        self.source
    }

    pub fn destination(&self) -> u16 {
        self.destination
    }

    /// Request frame for the current addresses.
    pub fn request(&self) -> Frame {
        Frame::new(
            self.source,
            self.destination,
            self.command.code(),
            self.command.request_data(),
        )
    }

    /// Validates a received frame and stores its payload.
    ///
    /// The frame must pass CRC and checksum checks and come from the addressed
    /// device, unless the request was sent to the broadcast address.
    pub fn parse_response(&mut self, frame: &Frame) -> Result<(), MercuryError> {
        verify_frame(frame)?;

        if self.destination != MERCURY_ADDRESS_BROADCAST && self.destination != frame.source {
            return Err(MercuryError::AddressMismatch(format!(
                "incorrect destination in response: 0x{:04X}",
                frame.source
            )));
        }

        self.source = frame.destination;
        self.destination = frame.source;
        self.response = Some((frame.code, frame.data.clone()));
        Ok(())
    }

    /// Decodes the stored response.
    pub fn result(&self) -> Result<C::Output, MercuryError> {
        match &self.response {
            Some((code, data)) => self.command.decode(*code, data),
            None => Err(MercuryError::DecodeError("no response received".into())),
        }
    }
}
