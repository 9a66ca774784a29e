// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! Scripted in-memory transport for exercising the connection state machine
//! without a real peer. Incoming bytes are queued as chunks so tests control
//! exactly how frames are split or coalesced across reads.

use std::collections::VecDeque;

use super::error::{IpcError, IpcResult};
use super::transport::{IpcConfig, Transport};

/// In-memory transport for tests.
#[derive(Debug, Default)]
pub struct MockTransport {
    open: bool,
    fail_next_connects: u32,
    fail_next_send: bool,
    connect_attempts: u32,
    sent: Vec<Vec<u8>>,
    incoming: VecDeque<Vec<u8>>,
}

impl MockTransport {
    /// Creates a mock transport that accepts the first connection attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` connection attempts fail.
    pub fn fail_connects(&mut self, n: u32) {
        self.fail_next_connects = n;
    }

    /// Makes the next send fail, simulating a peer that died mid-session.
    pub fn fail_next_send(&mut self) {
        self.fail_next_send = true;
    }

    /// Queues a chunk of bytes to be returned by the next `read_available`.
    ///
    /// Each chunk is delivered by exactly one read, preserving the split
    /// the test scripted.
    pub fn queue_incoming(&mut self, chunk: impl Into<Vec<u8>>) {
        self.incoming.push_back(chunk.into());
    }

    /// Frames written so far, in order.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Clears the sent-frame log.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Number of connection attempts made, successful or not.
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _config: &IpcConfig) -> IpcResult<()> {
        self.connect_attempts += 1;
        if self.fail_next_connects > 0 {
            self.fail_next_connects -= 1;
            return Err(IpcError::ConnectionFailed("scripted failure".into()));
        }
        self.open = true;
        Ok(())
    }

    fn disconnect(&mut self) -> IpcResult<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, bytes: &[u8]) -> IpcResult<()> {
        if !self.open {
            return Err(IpcError::NotConnected);
        }
        if self.fail_next_send {
            self.fail_next_send = false;
            return Err(IpcError::SendFailed("scripted failure".into()));
        }
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    fn read_available(&mut self) -> IpcResult<Vec<u8>> {
        if !self.open {
            return Err(IpcError::NotConnected);
        }
        Ok(self.incoming.pop_front().unwrap_or_default())
    }
}
