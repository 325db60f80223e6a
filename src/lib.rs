//! # mercury-rs - A Rust Crate for the Mercury Meter Protocol
//!
//! The mercury-rs crate implements the master side of the binary
//! request/response protocol spoken by Mercury multi-tariff electricity meters
//! over a shared half-duplex serial line.
//!
//! ## Features
//!
//! - Build and validate frames (CRC-24 header check, biased payload checksum)
//! - Query the network id, read and write the configuration, read the last
//!   packet and the stored history of a counter
//! - Restore counter values protected by the single-byte redundancy code
//! - Discover a meter's address by talking to the broadcast address
//! - Skip responses from other devices on the bus with bounded retries
//!
//! ## Usage
//!
//! ```rust
//! use mercury_rs::{MockTransport, Session};
//!
//! let mock = MockTransport::new();
//! mock.queue_response(0x2F10, 0xFFFF, 0x86, &[0x10, 0x2F]);
//!
//! let mut session = Session::new(mock.clone(), 0x2FFF);
//! let id = tokio_test::block_on(session.get_network_id()).unwrap();
//! assert_eq!(id, 0x2F10);
//! assert_eq!(session.destination(), 0x2F10);
//! ```
//!
//! Against real hardware, use a [`SerialTransport`]:
//!
//! ```rust,no_run
//! use mercury_rs::{SerialTransport, Session};
//!
//! # async fn run() -> Result<(), mercury_rs::MercuryError> {
//! let mut session = Session::new(SerialTransport::new("/dev/ttyUSB0"), 0x2FFF);
//! let config = session.get_config().await?;
//! println!("{} counters in {} mode", config.counters, config.mode);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod error;
pub mod logging;
pub mod mercury;
pub mod payload;
pub mod util;

pub use crate::error::MercuryError;
pub use crate::logging::{init_logger_with_default, log_info};

// Core protocol types
pub use mercury::checksum::{checksum, crc24};
pub use mercury::command::{
    Command, GetConfig, GetHistory, GetLastPacket, GetNetworkId, SetConfig, Transaction,
};
pub use mercury::frame::{parse_frame, verify_frame, Frame};
pub use mercury::serial::{SerialConfig, SerialTransport};
pub use mercury::serial_mock::MockTransport;
pub use mercury::session::Session;
pub use mercury::transport::{Transport, TransportError};
pub use payload::{reconstruct, Config, HistoryRecord, Mode};

/// Opens a session on a serial device.
///
/// # Arguments
/// * `port` - Serial port path (e.g., "/dev/ttyUSB0")
/// * `address` - Meter address, or `0x2FFF` to discover it
pub fn connect(port: &str, address: u16) -> Session<SerialTransport> {
    Session::new(SerialTransport::new(port), address)
}

/// Opens a session on a serial device with custom line settings.
pub fn connect_with_config(
    port: &str,
    address: u16,
    config: SerialConfig,
) -> Session<SerialTransport> {
    Session::new(SerialTransport::with_config(port, config), address)
}
