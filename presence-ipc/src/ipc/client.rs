// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Presence Client
//!
//! Connection state machine for the presence session. Owns the transport,
//! the receive buffer, the reconnect scheduler and the nonce counter, and
//! exposes the public presence API plus the reactor entry points.
//!
//! The client never blocks and never spawns threads: the reactor binding
//! delivers data-ready, disconnect and timer events, and arms the real
//! timer from [`reconnect_after`](PresenceClient::reconnect_after).

use std::time::Duration;

use tracing::{debug, trace, warn};

use super::backoff::ReconnectBackoff;
use super::frame::{encode_frame, FrameDecoder, Opcode};
use super::transport::{IpcConfig, Transport};
use crate::message::{self, InboundEvent};
use crate::presence::Presence;

/// Connection state of the presence session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected; a reconnect may be pending.
    Disconnected,
    /// Scanning candidate endpoints.
    Connecting,
    /// Transport open, handshake written, waiting for the ready event.
    HandshakeSent,
    /// Session ready; presence commands are accepted.
    Connected,
}

/// Client for the local presence session.
///
/// Presence calls are fire-and-forget: when the session is not ready they
/// are dropped silently, because a stale presence from a previous session
/// is not worth replaying. All failures are recovered internally through
/// the reconnect loop; the only externally meaningful predicate is
/// [`is_connected`](PresenceClient::is_connected).
///
/// # Example
///
/// ```ignore
/// use presence_ipc::{IpcConfig, PipeTransport, Presence, PresenceClient};
///
/// let mut client = PresenceClient::new(PipeTransport::new(), IpcConfig::new("123456789"));
/// client.initialize();
/// // ... reactor delivers on_data_available() until the session is ready ...
/// if client.is_connected() {
///     client.update_presence(&Presence {
///         name: "Listening".into(),
///         ..Default::default()
///     });
/// }
/// ```
pub struct PresenceClient<T: Transport> {
    transport: T,
    config: IpcConfig,
    state: ConnectionState,
    decoder: FrameDecoder,
    backoff: ReconnectBackoff,
    /// Delay of the armed single-shot reconnect timer, if any.
    reconnect_armed: Option<Duration>,
    /// Correlation counter for outgoing commands. Starts at 1, never reused.
    nonce: u64,
}

impl<T: Transport> PresenceClient<T> {
    /// Creates a client in the `Disconnected` state.
    pub fn new(transport: T, config: IpcConfig) -> Self {
        let decoder = FrameDecoder::with_max_frame_size(config.max_frame_size);
        let backoff = ReconnectBackoff::new(
            config.reconnect_min_delay_ms,
            config.reconnect_max_delay_ms,
        );
        PresenceClient {
            transport,
            config,
            state: ConnectionState::Disconnected,
            decoder,
            backoff,
            reconnect_armed: None,
            nonce: 1,
        }
    }

    /// Begins a connection attempt. No-op unless currently `Disconnected`.
    pub fn initialize(&mut self) {
        if self.state != ConnectionState::Disconnected {
            return;
        }
        self.try_connect();
    }

    /// Tears the session down and cancels any pending reconnect.
    ///
    /// Idempotent: safe to call repeatedly, without a prior `initialize`,
    /// and from a drop path. Leaves the client in `Disconnected`; it may be
    /// re-initialized later.
    pub fn shutdown(&mut self) {
        self.reconnect_armed = None;
        let _ = self.transport.disconnect();
        self.decoder.clear();
        self.state = ConnectionState::Disconnected;
    }

    /// Sends a presence update. Dropped silently unless `Connected`.
    pub fn update_presence(&mut self, presence: &Presence) {
        if self.state != ConnectionState::Connected {
            trace!("presence update dropped, session not ready");
            return;
        }

        let command = message::set_activity(presence, self.nonce, std::process::id());
        self.nonce += 1;

        let frame = encode_frame(Opcode::Frame, command.to_string().as_bytes());
        if let Err(e) = self.transport.send(&frame) {
            warn!(error = %e, "presence send failed, dropping connection");
            self.drop_connection();
        }
    }

    /// Asks the peer to remove the displayed activity.
    ///
    /// Equivalent to `update_presence` with the all-empty [`Presence`].
    pub fn clear_presence(&mut self) {
        self.update_presence(&Presence::default());
    }

    /// True iff the session is ready for presence commands.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Delay of the armed reconnect timer, if one is pending.
    ///
    /// The reactor binding arms a single-shot timer for this duration and
    /// calls [`on_timer_fired`](PresenceClient::on_timer_fired) when it
    /// elapses.
    pub fn reconnect_after(&self) -> Option<Duration> {
        self.reconnect_armed
    }

    /// Reactor event: the transport has bytes ready to read.
    pub fn on_data_available(&mut self) {
        if !matches!(
            self.state,
            ConnectionState::HandshakeSent | ConnectionState::Connected
        ) {
            return;
        }

        match self.transport.read_available() {
            Ok(bytes) => {
                if !bytes.is_empty() {
                    self.decoder.extend(&bytes);
                    self.process_incoming();
                }
            }
            Err(e) => {
                debug!(error = %e, "transport read failed");
                self.drop_connection();
            }
        }
    }

    /// Reactor event: the peer closed or the transport errored.
    pub fn on_disconnected(&mut self) {
        if self.state == ConnectionState::Disconnected {
            return;
        }
        self.drop_connection();
    }

    /// Reactor event: the armed reconnect timer elapsed.
    pub fn on_timer_fired(&mut self) {
        if self.reconnect_armed.take().is_none() {
            return; // Timer was cancelled by shutdown
        }
        if self.state == ConnectionState::Disconnected {
            self.try_connect();
        }
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn try_connect(&mut self) {
        // A connection attempt supersedes any armed timer; if the reactor's
        // timer still fires, on_timer_fired sees the cleared flag and no-ops.
        self.reconnect_armed = None;
        self.state = ConnectionState::Connecting;

        if let Err(e) = self.transport.connect(&self.config) {
            debug!(error = %e, "no presence endpoint available");
            self.state = ConnectionState::Disconnected;
            self.schedule_reconnect();
            return;
        }

        let handshake = message::handshake(&self.config.client_id);
        let frame = encode_frame(Opcode::Handshake, handshake.to_string().as_bytes());
        match self.transport.send(&frame) {
            Ok(()) => {
                debug!("handshake sent, awaiting ready event");
                self.state = ConnectionState::HandshakeSent;
            }
            Err(e) => {
                warn!(error = %e, "handshake send failed");
                self.drop_connection();
            }
        }
    }

    /// Closes the transport and arms the reconnect timer.
    fn drop_connection(&mut self) {
        let _ = self.transport.disconnect();
        self.decoder.clear();
        self.state = ConnectionState::Disconnected;
        self.schedule_reconnect();
    }

    fn schedule_reconnect(&mut self) {
        let delay = self.backoff.next_delay();
        debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");
        self.reconnect_armed = Some(delay);
    }

    /// Drains every complete frame currently buffered.
    ///
    /// Frames arrive coalesced; stopping after the first would stall the
    /// rest until the next read.
    fn process_incoming(&mut self) {
        loop {
            let frame = match self.decoder.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return, // Partial frame, wait for more bytes
                Err(e) => {
                    warn!(error = %e, "malformed frame header, dropping connection");
                    self.drop_connection();
                    return;
                }
            };

            match Opcode::from_u32(frame.opcode) {
                Some(Opcode::Frame) => self.handle_message(&frame.payload),
                Some(Opcode::Close) => {
                    debug!("peer requested close");
                    self.drop_connection();
                    return;
                }
                Some(Opcode::Ping) => {
                    let pong = encode_frame(Opcode::Pong, &frame.payload);
                    if let Err(e) = self.transport.send(&pong) {
                        warn!(error = %e, "pong send failed");
                        self.drop_connection();
                        return;
                    }
                }
                // The peer occasionally sends frames irrelevant to this
                // client; unknown opcodes are not an error.
                Some(Opcode::Pong) | Some(Opcode::Handshake) | None => {}
            }
        }
    }

    /// Handles an inbound `Frame` payload.
    ///
    /// Only ready detection is modeled; malformed JSON and unrelated events
    /// are ignored without touching the connection.
    fn handle_message(&mut self, payload: &[u8]) {
        if self.state != ConnectionState::HandshakeSent {
            return;
        }

        let Ok(event) = serde_json::from_slice::<InboundEvent>(payload) else {
            return;
        };

        if event.is_ready() {
            debug!("presence session ready");
            self.state = ConnectionState::Connected;
            self.backoff.reset();
        }
    }
}

// INLINE_TEST_REQUIRED: Tests private receive-buffer and nonce state
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::mock::MockTransport;

    fn ready_frame() -> Vec<u8> {
        encode_frame(Opcode::Frame, br#"{"cmd":"DISPATCH","evt":"READY"}"#)
    }

    fn connected_client() -> PresenceClient<MockTransport> {
        let mut client = PresenceClient::new(MockTransport::new(), IpcConfig::new("app"));
        client.initialize();
        client.transport_mut().queue_incoming(ready_frame());
        client.on_data_available();
        assert!(client.is_connected());
        client
    }

    #[test]
    fn test_disconnect_clears_partial_receive_buffer() {
        let mut client = connected_client();

        // Leave a partial frame in the buffer, then lose the peer.
        client.transport_mut().queue_incoming(vec![1, 0, 0]);
        client.on_data_available();
        assert_eq!(client.decoder.buffered_len(), 3);

        client.on_disconnected();
        assert_eq!(client.decoder.buffered_len(), 0);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_nonce_starts_at_one_and_increments_per_command() {
        let mut client = connected_client();
        assert_eq!(client.nonce, 1);

        client.update_presence(&Presence::default());
        client.update_presence(&Presence::default());
        assert_eq!(client.nonce, 3);
    }

    #[test]
    fn test_dropped_update_does_not_consume_nonce() {
        let mut client = PresenceClient::new(MockTransport::new(), IpcConfig::new("app"));
        client.transport_mut().fail_connects(1);
        client.initialize();

        client.update_presence(&Presence::default());
        assert_eq!(client.nonce, 1);
    }
}
