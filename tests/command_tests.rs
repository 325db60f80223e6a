//! Tests for request encoding and response decoding of every command kind.

use chrono::{Datelike, NaiveDate, Timelike};
use mercury_rs::error::MercuryError;
use mercury_rs::mercury::command::{
    Command, GetConfig, GetHistory, GetLastPacket, GetNetworkId, SetConfig, Transaction,
};
use mercury_rs::mercury::frame::Frame;
use mercury_rs::payload::config::{Config, Mode};
use mercury_rs::payload::redundancy::check_byte;
use proptest::prelude::*;

/// One 11-byte history reading.
fn reading(kind: u8, base: u16, inc: u8, level: u8, ymdhm: [u8; 5]) -> Vec<u8> {
    let [year, month, day, hour, minute] = ymdhm;
    let mut bytes = vec![kind];
    bytes.extend_from_slice(&base.to_le_bytes());
    bytes.extend_from_slice(&[inc, check_byte(inc), level, minute, hour, day, month, year]);
    bytes
}

#[test]
fn test_network_id_decode() {
    assert_eq!(GetNetworkId.decode(0x86, &[0x10, 0x2F]).unwrap(), 0x2F10);
}

#[test]
fn test_network_id_wrong_code() {
    let err = GetNetworkId.decode(0x80, &[0x10, 0x2F]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Decode error: incorrect response code: expected 0x86, got 0x80"
    );
}

#[test]
fn test_network_id_wrong_length() {
    assert!(matches!(
        GetNetworkId.decode(0x86, &[0x10]),
        Err(MercuryError::DecodeError(_))
    ));
}

#[test]
fn test_get_config_decode() {
    let config = GetConfig.decode(0x80, &[0x08, 0x00, 0b0010_1110]).unwrap();
    assert_eq!(
        config,
        Config {
            counters: 8,
            transparent_mode: false,
            zero_threshold: true,
            mode: Mode::SlaveSR,
            dst: false,
            plc_disabled: true,
        }
    );
}

/// SetConfig decodes its acknowledgement exactly like GetConfig.
#[test]
fn test_set_config_reuses_get_config_decode() {
    let config = Config {
        counters: 2,
        transparent_mode: false,
        zero_threshold: false,
        mode: Mode::Normal,
        dst: true,
        plc_disabled: false,
    };
    let cmd = SetConfig::new(config);
    let payload = cmd.request_data();
    assert_eq!(cmd.decode(0x80, &payload).unwrap(), config);
    assert!(matches!(
        cmd.decode(0x00, &payload),
        Err(MercuryError::DecodeError(_))
    ));
}

#[test]
fn test_counter_request_data() {
    assert_eq!(GetLastPacket::new(0x0102).request_data(), vec![0x02, 0x01]);
    assert_eq!(GetHistory::new(3).request_data(), vec![0x03, 0x00]);
}

#[test]
fn test_last_packet_absent() {
    assert_eq!(GetLastPacket::new(1).decode(0x82, &[]).unwrap(), None);
}

#[test]
fn test_last_packet_decode() {
    let mut payload = vec![0x01, 0x00];
    payload.extend(reading(0x02, 5000, 0x05, 0x07, [16, 2, 14, 9, 30]));
    assert_eq!(payload.len(), 13);

    let record = GetLastPacket::new(1).decode(0x82, &payload).unwrap().unwrap();
    assert_eq!(record.kind, 0x02);
    assert_eq!(record.level, 0x07);
    assert_eq!(record.value, Some(5005));
    let date = record.date.unwrap();
    assert_eq!((date.year(), date.month(), date.day()), (2016, 3, 15));
    assert_eq!((date.hour(), date.minute()), (9, 30));
}

#[test]
fn test_last_packet_corrupted_value() {
    let mut payload = vec![0x01, 0x00];
    payload.extend(reading(0x02, 5000, 0x05, 0x07, [16, 2, 14, 9, 30]));
    payload[6] ^= 0xFF; // check byte
    let record = GetLastPacket::new(1).decode(0x82, &payload).unwrap().unwrap();
    assert_eq!(record.value, None);
    assert!(record.date.is_some());
}

#[test]
fn test_last_packet_wrong_length() {
    assert!(matches!(
        GetLastPacket::new(1).decode(0x82, &[0u8; 14]),
        Err(MercuryError::DecodeError(_))
    ));
}

/// 30 February does not exist; the reading is still returned.
#[test]
fn test_last_packet_invalid_date() {
    let mut payload = vec![0x01, 0x00];
    payload.extend(reading(0x01, 10, 0x00, 0x00, [30, 1, 29, 0, 0]));
    let record = GetLastPacket::new(1).decode(0x82, &payload).unwrap().unwrap();
    assert_eq!(record.date, None);
    assert_eq!(record.value, Some(10));
}

#[test]
fn test_history_empty() {
    assert!(GetHistory::new(3).decode(0x85, &[]).unwrap().is_empty());
}

#[test]
fn test_history_three_records_in_order() {
    let mut payload = vec![0x03, 0x00];
    payload.extend(reading(0x01, 100, 0x01, 0x0A, [16, 0, 0, 0, 0]));
    payload.extend(reading(0x01, 200, 0x02, 0x0B, [30, 1, 29, 0, 0]));
    payload.extend(reading(0x01, 300, 0x03, 0x0C, [16, 11, 30, 23, 59]));
    assert_eq!(payload.len(), 2 + 11 * 3);

    let records = GetHistory::new(3).decode(0x85, &payload).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.value).collect::<Vec<_>>(),
        vec![Some(101), Some(202), Some(303)]
    );
    assert_eq!(
        records[0].date,
        NaiveDate::from_ymd_opt(2016, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    );
    assert_eq!(records[1].date, None);
    assert_eq!(
        records[2].date,
        NaiveDate::from_ymd_opt(2016, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 0))
    );
}

#[test]
fn test_history_partial_record() {
    let mut payload = vec![0x03, 0x00];
    payload.extend(reading(0x01, 100, 0x01, 0x0A, [16, 0, 0, 0, 0]));
    payload.pop();
    assert!(matches!(
        GetHistory::new(3).decode(0x85, &payload),
        Err(MercuryError::FramingError(_))
    ));
}

#[test]
fn test_history_other_counter() {
    let mut payload = vec![0x04, 0x00];
    payload.extend(reading(0x01, 100, 0x01, 0x0A, [16, 0, 0, 0, 0]));
    assert!(matches!(
        GetHistory::new(3).decode(0x85, &payload),
        Err(MercuryError::AddressMismatch(_))
    ));
}

#[test]
fn test_transaction_rejects_other_device() {
    let mut tx = Transaction::new(GetNetworkId, 0xFFFF, 0x2F10);
    let frame = Frame::new(0x2F20, 0xFFFF, 0x86, vec![0x20, 0x2F]);
    assert!(matches!(
        tx.parse_response(&frame),
        Err(MercuryError::AddressMismatch(_))
    ));
    assert_eq!(tx.destination(), 0x2F10);
}

#[test]
fn test_transaction_rejects_corrupt_frame() {
    let mut tx = Transaction::new(GetNetworkId, 0xFFFF, 0x2F10);
    let mut frame = Frame::new(0x2F10, 0xFFFF, 0x86, vec![0x10, 0x2F]);
    frame.checksum ^= 0x55;
    assert!(matches!(
        tx.parse_response(&frame),
        Err(MercuryError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_transaction_request_frame() {
    let tx = Transaction::new(GetHistory::new(3), 0xFFFF, 0x2F10);
    let request = tx.request();
    assert_eq!(request.code, 0x85);
    assert_eq!(request.data, vec![0x03, 0x00]);
    assert_eq!(request.destination, 0x2F10);
}

fn any_mode() -> impl Strategy<Value = Mode> {
    prop::sample::select(Mode::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_config_round_trip(
        counters in any::<u16>(),
        mode in any_mode(),
        transparent_mode in any::<bool>(),
        zero_threshold in any::<bool>(),
        dst in any::<bool>(),
        plc_disabled in any::<bool>(),
    ) {
        let config = Config { counters, transparent_mode, zero_threshold, mode, dst, plc_disabled };
        let payload = SetConfig::new(config).request_data();
        prop_assert_eq!(GetConfig.decode(0x80, &payload).unwrap(), config);
    }
}

/// Exhaustive version of the round trip over modes and flags.
#[test]
fn test_config_round_trip_all_combinations() {
    for mode in Mode::ALL {
        for bits in 0u8..16 {
            let config = Config {
                counters: 1,
                transparent_mode: bits & 1 != 0,
                zero_threshold: bits & 2 != 0,
                mode,
                dst: bits & 4 != 0,
                plc_disabled: bits & 8 != 0,
            };
            assert_eq!(Config::decode(&config.encode()).unwrap(), config);
        }
    }
}
