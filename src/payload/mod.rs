//! The payload module contains the components responsible for decoding and
//! encoding the data carried inside Mercury frames: the meter configuration,
//! counter readings, and the redundancy code that protects counter values.

pub mod config;
pub mod record;
pub mod redundancy;

pub use config::{Config, ConfigFlags, Mode};
pub use record::{decode_history, decode_last_packet, meter_date, HistoryRecord};
pub use redundancy::{check_byte, reconstruct, REDUNDANCY_TABLE};
