//! Mock transport implementation for testing
//!
//! This module provides a mock transport that can be used to test the Mercury
//! session without requiring an actual serial line. Clones share state, so a
//! test keeps one clone to queue responses and inspect what was written while
//! the session owns another.

use crate::mercury::frame::Frame;
use crate::mercury::transport::{Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation a one-shot error is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    Open,
    Configure,
    Write,
    Read,
}

#[derive(Default)]
struct MockState {
    is_open: bool,
    /// Data written to the port (outgoing)
    tx: Vec<u8>,
    /// Data to be read from the port (incoming)
    rx: VecDeque<u8>,
    /// Bytes already on the line before the request; discarded by flush
    stale: VecDeque<u8>,
    next_error: Option<(MockOperation, TransportError)>,
    open_count: usize,
    configure_count: usize,
    flush_count: usize,
    read_sizes: Vec<usize>,
}

/// Mock transport that simulates a half-duplex line
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Queue raw bytes to be read from the port
    pub fn queue_rx_data(&self, data: &[u8]) {
        self.state().rx.extend(data);
    }

    /// Queue a well-formed response frame
    pub fn queue_response(&self, source: u16, destination: u16, code: u8, data: &[u8]) {
        self.queue_rx_data(&Frame::new(source, destination, code, data.to_vec()).pack());
    }

    /// Queue bytes that are already on the line before the request is sent
    pub fn queue_stale_data(&self, data: &[u8]) {
        self.state().stale.extend(data);
    }

    /// Get data that was written to the port
    pub fn get_tx_data(&self) -> Vec<u8> {
        self.state().tx.clone()
    }

    /// Split the written bytes into the frames they contain
    pub fn sent_frames(&self) -> Vec<Frame> {
        let tx = self.get_tx_data();
        let mut input = &tx[..];
        let mut frames = Vec::new();
        while let Ok((rest, frame)) = crate::mercury::frame::parse_frame(input) {
            frames.push(frame);
            input = rest;
        }
        frames
    }

    /// Bytes still waiting to be read
    pub fn pending_rx(&self) -> usize {
        let state = self.state();
        state.rx.len() + state.stale.len()
    }

    /// Set an error to be returned by the next matching operation
    pub fn set_next_error(&self, operation: MockOperation, error: TransportError) {
        self.state().next_error = Some((operation, error));
    }

    pub fn open_count(&self) -> usize {
        self.state().open_count
    }

    pub fn configure_count(&self) -> usize {
        self.state().configure_count
    }

    pub fn flush_count(&self) -> usize {
        self.state().flush_count
    }

    /// Sizes requested by each read, in order
    pub fn read_sizes(&self) -> Vec<usize> {
        self.state().read_sizes.clone()
    }

    fn take_error(state: &mut MockState, operation: MockOperation) -> Result<(), TransportError> {
        match state.next_error.take() {
            Some((op, error)) if op == operation => Err(error),
            other => {
                state.next_error = other;
                Ok(())
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn open(&mut self) -> Result<(), TransportError> {
        let mut state = self.state();
        Self::take_error(&mut state, MockOperation::Open)?;
        if !state.is_open {
            state.is_open = true;
            state.open_count += 1;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state().is_open
    }

    async fn configure(&mut self) -> Result<(), TransportError> {
        let mut state = self.state();
        if !state.is_open {
            return Err(TransportError::NotOpen);
        }
        Self::take_error(&mut state, MockOperation::Configure)?;
        state.configure_count += 1;
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state();
        if !state.is_open {
            return Err(TransportError::NotOpen);
        }
        Self::take_error(&mut state, MockOperation::Write)?;
        state.tx.extend_from_slice(data);
        Ok(data.len())
    }

    async fn read(&mut self, size: usize) -> Result<Vec<u8>, TransportError> {
        let mut state = self.state();
        if !state.is_open {
            return Err(TransportError::NotOpen);
        }
        Self::take_error(&mut state, MockOperation::Read)?;
        state.read_sizes.push(size);

        // Stale bytes arrive first; a short queue behaves like a timeout.
        let mut received = Vec::with_capacity(size);
        while received.len() < size {
            let next = match state.stale.pop_front() {
                Some(byte) => Some(byte),
                None => state.rx.pop_front(),
            };
            match next {
                Some(byte) => received.push(byte),
                None => break,
            }
        }
        Ok(received)
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        let mut state = self.state();
        if !state.is_open {
            return Err(TransportError::NotOpen);
        }
        state.stale.clear();
        state.flush_count += 1;
        Ok(())
    }

    async fn close(&mut self) {
        self.state().is_open = false;
    }
}
