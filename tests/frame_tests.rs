//! Unit tests for the `frame.rs` module: packing requests, parsing responses and
//! verifying their integrity values.

use mercury_rs::error::MercuryError;
use mercury_rs::mercury::frame::{
    frame_from_stages, parse_frame, parse_header, verify_frame, Frame,
};
use mercury_rs::util::hex::decode_hex;

/// Tests that a GetNetworkID request to the broadcast address packs correctly.
#[test]
fn test_pack_network_id_request() {
    let frame = Frame::new(0xFFFF, 0x2FFF, 0x86, vec![]);
    assert_eq!(frame.pack(), decode_hex("63e0a7 ffff ff2f 01 86 85").unwrap());
    assert_eq!(frame.wire_len(), 10);
}

/// Tests that a SetConfig request packs counters and config byte.
#[test]
fn test_pack_set_config_request() {
    let frame = Frame::new(0xFFFF, 0x2F10, 0x00, vec![0x04, 0x00, 0x15]);
    assert_eq!(
        frame.pack(),
        decode_hex("1a92cd ffff 102f 04 00 040015 18").unwrap()
    );
}

/// Tests that a captured response parses into its fields.
#[test]
fn test_parse_network_id_response() {
    let bytes = decode_hex("60bdd8 102f ffff 03 86 102f c4").unwrap();
    let (rest, frame) = parse_frame(&bytes).unwrap();
    assert!(rest.is_empty());
    assert_eq!(frame.source, 0x2F10);
    assert_eq!(frame.destination, 0xFFFF);
    assert_eq!(frame.length, 3);
    assert_eq!(frame.code, 0x86);
    assert_eq!(frame.data, vec![0x10, 0x2F]);
    assert_eq!(frame.checksum, 0xC4);
    assert!(verify_frame(&frame).is_ok());
}

#[test]
fn test_header_body_len() {
    let bytes = decode_hex("60bdd8 102f ffff 03").unwrap();
    let (_, header) = parse_header(&bytes).unwrap();
    assert_eq!(header.body_len(), 4);
}

/// Tests that a corrupted header byte is caught by the CRC.
#[test]
fn test_verify_crc_mismatch() {
    let mut bytes = Frame::new(0x2F10, 0xFFFF, 0x86, vec![0x10, 0x2F]).pack();
    bytes[3] ^= 0x01;
    let (_, frame) = parse_frame(&bytes).unwrap();
    assert!(matches!(
        verify_frame(&frame),
        Err(MercuryError::CrcMismatch { .. })
    ));
}

/// Tests that a corrupted payload byte is caught by the checksum.
#[test]
fn test_verify_checksum_mismatch() {
    let mut bytes = Frame::new(0x2F10, 0xFFFF, 0x86, vec![0x10, 0x2F]).pack();
    bytes[9] ^= 0x01;
    let (_, frame) = parse_frame(&bytes).unwrap();
    match verify_frame(&frame) {
        Err(MercuryError::ChecksumMismatch { expected, calculated }) => {
            assert_eq!(expected, 0xC4);
            assert_eq!(calculated, 0xC5);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

/// Tests that a truncated frame does not parse.
#[test]
fn test_parse_truncated() {
    let bytes = Frame::new(0x2F10, 0xFFFF, 0x86, vec![0x10, 0x2F]).pack();
    assert!(parse_frame(&bytes[..bytes.len() - 1]).is_err());
}

/// Tests the exact-count rules of the two read stages.
#[test]
fn test_stage_rules() {
    let bytes = Frame::new(0x2F10, 0xFFFF, 0x80, vec![0x04, 0x00, 0x15]).pack();
    let frame = frame_from_stages(&bytes[..8], &bytes[8..]).unwrap();
    assert_eq!(frame.data, vec![0x04, 0x00, 0x15]);

    let mut long_body = bytes[8..].to_vec();
    long_body.push(0x00);
    assert!(matches!(
        frame_from_stages(&bytes[..8], &long_body),
        Err(MercuryError::FramingError(_))
    ));
    assert!(matches!(
        frame_from_stages(&bytes[..9], &bytes[9..]),
        Err(MercuryError::FramingError(_))
    ));
}
