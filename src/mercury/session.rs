//! # Mercury Session
//!
//! A [`Session`] owns one transport and the addressing state of one bus
//! segment. Each call to [`Session::execute`] runs a single request/response
//! exchange:
//!
//! 1. bind the command to the current source and destination,
//! 2. open and configure the transport if needed, flush stale bytes,
//! 3. write the request,
//! 4. receive frames until one arrives from the expected source, skipping at
//!    most [`MERCURY_RECEIVE_ATTEMPTS`] frames from foreign senders.
//!
//! When the destination is the broadcast address, the first response from an
//! address in the discovery range becomes the session's destination.
//!
//! Only foreign-source frames are retried. Anything wrong with a frame from the
//! expected source ends the exchange with an error.

use crate::constants::{
    MERCURY_ADDRESS_BROADCAST, MERCURY_ADDRESS_DISCOVERY_HIGH, MERCURY_ADDRESS_DISCOVERY_LOW,
    MERCURY_ADDRESS_MASTER, MERCURY_HEADER_SIZE, MERCURY_RECEIVE_ATTEMPTS,
};
use crate::error::MercuryError;
use crate::mercury::command::{
    Command, GetConfig, GetHistory, GetLastPacket, GetNetworkId, SetConfig, Transaction,
};
use crate::mercury::frame::{check_stage, frame_from_stages, parse_header};
use crate::mercury::transport::Transport;
use crate::payload::config::Config;
use crate::payload::record::HistoryRecord;
use crate::util::hex::dump_hex;
use crate::logging::{log_debug, log_info, log_warn};
use log::debug;

/// Outcome of one receive attempt.
#[derive(Debug, PartialEq, Eq)]
enum Reception {
    /// The frame came from the expected source and was accepted.
    Matched,
    /// The frame came from another device; try again.
    Foreign(u16),
}

/// Returns true for addresses a device may be discovered at.
pub fn is_discoverable(address: u16) -> bool {
    address > MERCURY_ADDRESS_DISCOVERY_LOW && address < MERCURY_ADDRESS_DISCOVERY_HIGH
}

/// Serializes all exchanges with the meters behind one transport.
pub struct Session<T: Transport> {
    transport: T,
    source: u16,
    destination: u16,
}

impl<T: Transport> Session<T> {
    /// Creates a session that talks to `destination` as the default master.
    ///
    /// Pass [`MERCURY_ADDRESS_BROADCAST`] to discover the meter's address on
    /// the first exchange.
    pub fn new(transport: T, destination: u16) -> Self {
        Self::with_source(transport, MERCURY_ADDRESS_MASTER, destination)
    }

    pub fn with_source(transport: T, source: u16, destination: u16) -> Self {
        Session {
            transport,
            source,
            destination,
        }
    }

    pub fn source(&self) -> u16 {
        self.source
    }

    /// Current destination, updated by address discovery.
    pub fn destination(&self) -> u16 {
        self.destination
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs one exchange and returns the decoded result.
    pub async fn execute<C: Command>(&mut self, command: C) -> Result<C::Output, MercuryError> {
        let mut transaction = Transaction::new(command, self.source, self.destination);

        if !self.transport.is_open() {
            self.transport.open().await?;
            // A line that failed to configure is closed so the next call reopens it.
            if let Err(e) = self.transport.configure().await {
                self.transport.close().await;
                return Err(e.into());
            }
        }

        self.transport.flush().await?;

        let request = transaction.request().pack();
        debug!("Send: {}", dump_hex(&request));
        self.transport.write(&request).await?;

        for attempt in 1..=MERCURY_RECEIVE_ATTEMPTS {
            match self.receive(&mut transaction).await? {
                Reception::Matched => return transaction.result(),
                Reception::Foreign(src) => log_debug(&format!(
                    "Receive from another source (0x{src:04X}), attempt {attempt} of {MERCURY_RECEIVE_ATTEMPTS}"
                )),
            }
        }

        log_warn(&format!(
            "No response from 0x{:04X} after {} attempts",
            self.destination, MERCURY_RECEIVE_ATTEMPTS
        ));
        Err(MercuryError::RetryLimitExceeded(MERCURY_RECEIVE_ATTEMPTS))
    }

    async fn receive<C: Command>(
        &mut self,
        transaction: &mut Transaction<C>,
    ) -> Result<Reception, MercuryError> {
        let header = self.transport.read(MERCURY_HEADER_SIZE).await?;
        if header.is_empty() {
            return Err(MercuryError::NoResponse(self.destination));
        }
        if let Err(e) = check_stage(1, header.len(), MERCURY_HEADER_SIZE) {
            debug!("Recv: {}", dump_hex(&header));
            return Err(e);
        }
        let (_, parsed) =
            parse_header(&header).map_err(|e| MercuryError::FramingError(format!("{e:?}")))?;
        if parsed.length == 0 {
            return Err(MercuryError::FramingError("incorrect response length: 0".into()));
        }

        let body = self.transport.read(parsed.body_len()).await?;
        let frame = frame_from_stages(&header, &body)?;
        debug!("Recv: {}", dump_hex(&frame.pack()));

        if transaction.destination() == MERCURY_ADDRESS_BROADCAST && is_discoverable(frame.source) {
            log_info(&format!("Discovered device at 0x{:04X}", frame.source));
            self.destination = frame.source;
        }

        if frame.source != self.destination {
            return Ok(Reception::Foreign(frame.source));
        }

        transaction.parse_response(&frame)?;
        Ok(Reception::Matched)
    }

    /// Reads the meter's network address.
    pub async fn get_network_id(&mut self) -> Result<u16, MercuryError> {
        self.execute(GetNetworkId).await
    }

    pub async fn get_config(&mut self) -> Result<Config, MercuryError> {
        self.execute(GetConfig).await
    }

    pub async fn set_config(&mut self, config: Config) -> Result<Config, MercuryError> {
        self.execute(SetConfig::new(config)).await
    }

    /// Reads the last packet of `counter`, or `None` if the meter has none.
    pub async fn get_last_packet(
        &mut self,
        counter: u16,
    ) -> Result<Option<HistoryRecord>, MercuryError> {
        self.execute(GetLastPacket::new(counter)).await
    }

    pub async fn get_history(&mut self, counter: u16) -> Result<Vec<HistoryRecord>, MercuryError> {
        self.execute(GetHistory::new(counter)).await
    }

    /// Closes the transport. Never fails.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }
}
