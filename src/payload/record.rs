//! # Counter Records
//!
//! GetLastPacket and GetHistory both return counter readings laid out as
//! `type, base:LE16, inc, check, level, minute, hour, day, month, year`. The
//! last packet additionally carries the counter address in front.
//!
//! Calendar fields are zero-based for day and month and offset from the year
//! 2000. A reading whose fields do not form a real date keeps `date = None`;
//! a reading whose check byte fails keeps `value = None`.

use crate::constants::{MERCURY_HISTORY_RECORD_SIZE, MERCURY_LAST_PACKET_SIZE};
use crate::error::MercuryError;
use crate::payload::redundancy::reconstruct;
use chrono::{NaiveDate, NaiveDateTime};
use nom::number::complete::{le_u16, le_u8};
use nom::IResult;
use serde::{Deserialize, Serialize};

/// One counter reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub level: u8,
    #[serde(rename = "type")]
    pub kind: u8,
    pub date: Option<NaiveDateTime>,
    pub value: Option<u32>,
}

/// Builds the timestamp of a reading, or `None` for impossible calendar values.
pub fn meter_date(year: u8, month: u8, day: u8, hour: u8, minute: u8) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2000 + year as i32, month as u32 + 1, day as u32 + 1)?
        .and_hms_opt(hour as u32, minute as u32, 0)
}

fn parse_reading(input: &[u8]) -> IResult<&[u8], HistoryRecord> {
    let (input, kind) = le_u8(input)?;
    let (input, base) = le_u16(input)?;
    let (input, inc) = le_u8(input)?;
    let (input, check) = le_u8(input)?;
    let (input, level) = le_u8(input)?;
    let (input, minute) = le_u8(input)?;
    let (input, hour) = le_u8(input)?;
    let (input, day) = le_u8(input)?;
    let (input, month) = le_u8(input)?;
    let (input, year) = le_u8(input)?;
    Ok((
        input,
        HistoryRecord {
            level,
            kind,
            date: meter_date(year, month, day, hour, minute),
            value: reconstruct(base, inc, check),
        },
    ))
}

fn parse_last_packet(input: &[u8]) -> IResult<&[u8], (u16, HistoryRecord)> {
    let (input, counter) = le_u16(input)?;
    let (input, record) = parse_reading(input)?;
    Ok((input, (counter, record)))
}

/// Decodes a GetLastPacket payload. An empty payload means the meter has no
/// last packet for the counter.
pub fn decode_last_packet(data: &[u8]) -> Result<Option<HistoryRecord>, MercuryError> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() != MERCURY_LAST_PACKET_SIZE {
        return Err(MercuryError::DecodeError(format!(
            "incorrect response length: expected {}, got {}",
            MERCURY_LAST_PACKET_SIZE,
            data.len()
        )));
    }
    let (_, (counter, record)) =
        parse_last_packet(data).map_err(|e| MercuryError::DecodeError(format!("{e:?}")))?;
    log::debug!("Last packet for counter {counter}: {record:?}");
    Ok(Some(record))
}

/// Decodes a GetHistory payload for `counter`.
///
/// The payload starts with the echoed counter id followed by zero or more
/// 11-byte readings. Readings with an impossible date are kept with
/// `date = None`.
pub fn decode_history(counter: u16, data: &[u8]) -> Result<Vec<HistoryRecord>, MercuryError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if data.len() < 2 {
        return Err(MercuryError::FramingError(format!(
            "history response too short: {} bytes",
            data.len()
        )));
    }
    let echoed = u16::from_le_bytes([data[0], data[1]]);
    if echoed != counter {
        return Err(MercuryError::AddressMismatch(format!(
            "history response for counter {echoed}, requested {counter}"
        )));
    }

    let body = &data[2..];
    if body.len() % MERCURY_HISTORY_RECORD_SIZE != 0 {
        return Err(MercuryError::FramingError(format!(
            "history body of {} bytes is not a multiple of {}",
            body.len(),
            MERCURY_HISTORY_RECORD_SIZE
        )));
    }

    body.chunks_exact(MERCURY_HISTORY_RECORD_SIZE)
        .map(|chunk| {
            parse_reading(chunk)
                .map(|(_, record)| record)
                .map_err(|e| MercuryError::DecodeError(format!("{e:?}")))
        })
        .collect()
}
