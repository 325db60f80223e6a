//! # Mercury Frame Codec
//!
//! Requests and responses share one wire layout (multi-byte fields are
//! little-endian):
//!
//! ```text
//! crc24[3] | src[2] | dst[2] | length[1] | code[1] | data[length-1] | checksum[1]
//! ```
//!
//! `length` counts the code byte plus the data bytes. The CRC covers
//! `src ++ dst ++ length`; the checksum covers `code ++ data`.
//!
//! ## Usage
//!
//! ```rust
//! use mercury_rs::mercury::frame::{parse_frame, verify_frame, Frame};
//!
//! let frame = Frame::new(0xFFFF, 0x2FFF, 0x86, vec![]);
//! let bytes = frame.pack();
//! assert_eq!(bytes, [0x63, 0xE0, 0xA7, 0xFF, 0xFF, 0xFF, 0x2F, 0x01, 0x86, 0x85]);
//!
//! let (_, parsed) = parse_frame(&bytes).unwrap();
//! assert!(verify_frame(&parsed).is_ok());
//! ```

use crate::constants::{MERCURY_CRC_SIZE, MERCURY_HEADER_SIZE, MERCURY_MAX_DATA_SIZE};
use crate::error::MercuryError;
use crate::mercury::checksum::{checksum, crc24, crc24_bytes, crc24_from_bytes};
use bytes::{BufMut, BytesMut};
use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u8};
use nom::IResult;

/// The fixed 8-byte prefix of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub crc: [u8; 3],
    pub source: u16,
    pub destination: u16,
    pub length: u8,
}

impl FrameHeader {
    /// Number of bytes that follow the header: payload plus checksum.
    pub fn body_len(&self) -> usize {
        self.length as usize + 1
    }
}

/// A complete Mercury frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub crc: [u8; 3],
    pub source: u16,
    pub destination: u16,
    pub length: u8,
    pub code: u8,
    pub data: Vec<u8>,
    pub checksum: u8,
}

/// CRC-24 over the address and length fields.
pub fn header_crc(source: u16, destination: u16, length: u8) -> u32 {
    let mut octets = [0u8; 5];
    octets[0..2].copy_from_slice(&source.to_le_bytes());
    octets[2..4].copy_from_slice(&destination.to_le_bytes());
    octets[4] = length;
    crc24(&octets)
}

/// Checksum over the code byte followed by the data bytes.
pub fn payload_checksum(code: u8, data: &[u8]) -> u8 {
    checksum(&[code]).wrapping_add(data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)))
}

impl Frame {
    /// Builds a frame with correct CRC and checksum.
    ///
    /// The length byte counts the code plus the data, so `data` holds at most
    /// [`MERCURY_MAX_DATA_SIZE`] bytes.
    pub fn new(source: u16, destination: u16, code: u8, data: Vec<u8>) -> Frame {
        debug_assert!(
            data.len() <= MERCURY_MAX_DATA_SIZE,
            "frame data of {} bytes exceeds the length byte",
            data.len()
        );
        let length = (data.len() + 1) as u8;
        Frame {
            crc: crc24_bytes(header_crc(source, destination, length)),
            source,
            destination,
            length,
            code,
            checksum: payload_checksum(code, &data),
            data,
        }
    }

    /// Total size on the wire.
    pub fn wire_len(&self) -> usize {
        MERCURY_HEADER_SIZE + self.data.len() + 2
    }

    /// Serializes the frame exactly as it goes on the wire.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        buf.put_slice(&self.crc);
        buf.put_u16_le(self.source);
        buf.put_u16_le(self.destination);
        buf.put_u8(self.length);
        buf.put_u8(self.code);
        buf.put_slice(&self.data);
        buf.put_u8(self.checksum);
        buf.to_vec()
    }
}

/// Parses the 8-byte header.
pub fn parse_header(input: &[u8]) -> IResult<&[u8], FrameHeader> {
    let (input, crc) = take(MERCURY_CRC_SIZE)(input)?;
    let (input, source) = le_u16(input)?;
    let (input, destination) = le_u16(input)?;
    let (input, length) = le_u8(input)?;
    Ok((
        input,
        FrameHeader {
            crc: [crc[0], crc[1], crc[2]],
            source,
            destination,
            length,
        },
    ))
}

/// Parses the payload and checksum that follow `header`.
pub fn parse_body(header: FrameHeader, input: &[u8]) -> IResult<&[u8], Frame> {
    let data_len = (header.length as usize).saturating_sub(1);
    let (input, code) = le_u8(input)?;
    let (input, data) = take(data_len)(input)?;
    let (input, checksum) = le_u8(input)?;
    Ok((
        input,
        Frame {
            crc: header.crc,
            source: header.source,
            destination: header.destination,
            length: header.length,
            code,
            data: data.to_vec(),
            checksum,
        },
    ))
}

/// Parses one complete frame.
pub fn parse_frame(input: &[u8]) -> IResult<&[u8], Frame> {
    let (input, header) = parse_header(input)?;
    parse_body(header, input)
}

/// Fails unless a read stage returned exactly `expected` bytes.
pub fn check_stage(stage: u8, got: usize, expected: usize) -> Result<(), MercuryError> {
    if got == expected {
        return Ok(());
    }
    Err(MercuryError::FramingError(format!(
        "response too {} in stage {stage}: {got} of {expected} bytes",
        if got < expected { "short" } else { "long" },
    )))
}

/// Assembles a frame from the two read stages of a receive, enforcing that
/// each stage holds exactly the expected number of bytes.
pub fn frame_from_stages(header: &[u8], body: &[u8]) -> Result<Frame, MercuryError> {
    check_stage(1, header.len(), MERCURY_HEADER_SIZE)?;
    let (_, parsed) =
        parse_header(header).map_err(|e| MercuryError::FramingError(format!("{e:?}")))?;
    if parsed.length == 0 {
        return Err(MercuryError::FramingError("incorrect response length: 0".into()));
    }
    check_stage(2, body.len(), parsed.body_len())?;
    let (_, frame) =
        parse_body(parsed, body).map_err(|e| MercuryError::FramingError(format!("{e:?}")))?;
    Ok(frame)
}

/// Verifies the header CRC and the payload checksum of a received frame.
pub fn verify_frame(frame: &Frame) -> Result<(), MercuryError> {
    let expected = crc24_from_bytes(frame.crc);
    let calculated = header_crc(frame.source, frame.destination, frame.length);
    if expected != calculated {
        return Err(MercuryError::CrcMismatch { expected, calculated });
    }

    let calculated = payload_checksum(frame.code, &frame.data);
    if frame.checksum != calculated {
        return Err(MercuryError::ChecksumMismatch {
            expected: frame.checksum,
            calculated,
        });
    }
    Ok(())
}
