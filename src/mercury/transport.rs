//! Transport abstraction
//!
//! The session talks to the bus only through this trait, so it can run over a
//! real serial port or over the in-memory mock used by the tests.

use std::io;
use thiserror::Error;

/// Errors raised by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("can't open port: {0}")]
    Open(String),

    #[error("port is not open")]
    NotOpen,

    #[error("can't configure port: {0}")]
    Configure(String),

    #[error("{0} timeout")]
    Timeout(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Half-duplex byte transport used by the session.
///
/// Every call is awaited to completion before the next one starts; a transport
/// is owned by exactly one session.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Opens the line. Calling it on an open transport is a no-op.
    async fn open(&mut self) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    /// Applies line parameters. Must follow `open`.
    async fn configure(&mut self) -> Result<(), TransportError>;

    /// Writes all bytes within the write timeout.
    async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Collects up to `size` bytes, stopping early when the read timeout
    /// expires. An empty result means nothing arrived at all.
    async fn read(&mut self, size: usize) -> Result<Vec<u8>, TransportError>;

    /// Discards unread and unwritten bytes.
    async fn flush(&mut self) -> Result<(), TransportError>;

    /// Best-effort close.
    async fn close(&mut self);
}
