// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Presence IPC Client Library
//!
//! Client for the local rich-presence protocol: connects to a peer process
//! over a platform-local byte stream (named pipe on Windows, Unix domain
//! socket elsewhere), performs a versioned handshake, and publishes
//! presence updates as length-prefixed JSON frames.
//!
//! The peer may be absent or restart at any time; the client reconnects
//! transparently with capped exponential backoff. The core is
//! single-threaded and reactor-driven: the host application's event loop
//! delivers data-ready, disconnect and timer notifications, and no call
//! here blocks beyond the bounded per-candidate connect attempt.

pub mod ipc;
pub mod message;
pub mod presence;

pub use ipc::{
    candidate_paths, encode_frame, ConnectionState, FrameDecoder, IpcConfig, IpcError, IpcResult,
    MockTransport, Opcode, PipeTransport, PresenceClient, RawFrame, ReconnectBackoff, Transport,
    DEFAULT_PIPE_BASE, ENDPOINT_SLOTS, FRAME_HEADER_SIZE, MAX_FRAME_SIZE,
};
pub use message::PROTOCOL_VERSION;
pub use presence::{ActivityType, Presence, StatusDisplayType};
