//! The mercury module contains the components responsible for the core protocol
//! implementation: integrity primitives, frame parsing and packing, the command
//! catalog, the session that drives exchanges, and the transports it runs over.

pub mod checksum;
pub mod command;
pub mod frame;
pub mod serial;
pub mod serial_mock;
pub mod session;
pub mod transport;

pub use command::*;
pub use frame::{parse_frame, verify_frame, Frame, FrameHeader};
pub use serial::{SerialConfig, SerialTransport};
pub use serial_mock::{MockOperation, MockTransport};
pub use session::Session;
pub use transport::{Transport, TransportError};
