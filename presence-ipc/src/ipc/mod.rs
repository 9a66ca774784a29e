// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! IPC Layer
//!
//! Transport discovery, wire framing and the connection state machine.
//!
//! # Architecture
//!
//! - **Endpoint discovery**: ordered candidate scan over the platform's
//!   well-known pipe/socket names
//! - **Frame codec**: length-prefixed, opcode-tagged frames with incremental
//!   reassembly
//! - **Transport trait**: real pipe/socket in production, scripted mock in
//!   tests
//! - **Backoff**: capped exponential reconnect delays
//! - **Client**: the state machine tying it all together

mod backoff;
mod client;
mod endpoint;
mod error;
mod frame;
mod mock;
mod socket;
mod transport;

// Error types
pub use error::{IpcError, IpcResult};

// Frame codec
pub use frame::{
    encode_frame, FrameDecoder, Opcode, RawFrame, FRAME_HEADER_SIZE, MAX_FRAME_SIZE,
};

// Endpoint discovery
pub use endpoint::{candidate_paths, DEFAULT_PIPE_BASE, ENDPOINT_SLOTS};
#[cfg(unix)]
pub use endpoint::candidate_paths_in;

// Transport abstraction
pub use transport::{IpcConfig, Transport};

// Mock transport for testing
pub use mock::MockTransport;

// Platform transport for production
pub use socket::PipeTransport;

// Reconnect scheduling
pub use backoff::ReconnectBackoff;

// Connection state machine
pub use client::{ConnectionState, PresenceClient};
