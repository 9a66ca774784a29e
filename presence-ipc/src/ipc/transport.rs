//! Transport Trait
//!
//! Platform-agnostic abstraction over the local byte stream to the peer.

use std::path::PathBuf;

use super::endpoint::DEFAULT_PIPE_BASE;
use super::error::IpcResult;
use super::frame::MAX_FRAME_SIZE;

/// Configuration for the IPC client.
#[derive(Debug, Clone)]
pub struct IpcConfig {
    /// Application identifier announced in the handshake.
    pub client_id: String,
    /// Endpoint base name (`<base>-0` .. `<base>-9`).
    pub pipe_base: String,
    /// Per-candidate connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Reconnect backoff floor in milliseconds.
    pub reconnect_min_delay_ms: u64,
    /// Reconnect backoff ceiling in milliseconds.
    pub reconnect_max_delay_ms: u64,
    /// Largest inbound payload length accepted before the connection is
    /// considered corrupt.
    pub max_frame_size: usize,
    /// Overrides the environment-based socket directory scan with a single
    /// directory. Unix only; used by tests and containerized setups.
    pub socket_dir: Option<PathBuf>,
}

impl Default for IpcConfig {
    fn default() -> Self {
        IpcConfig {
            client_id: String::new(),
            pipe_base: DEFAULT_PIPE_BASE.to_string(),
            connect_timeout_ms: 100,
            reconnect_min_delay_ms: 500,
            reconnect_max_delay_ms: 60_000,
            max_frame_size: MAX_FRAME_SIZE,
            socket_dir: None,
        }
    }
}

impl IpcConfig {
    /// Creates a config for the given application identifier.
    pub fn new(client_id: impl Into<String>) -> Self {
        IpcConfig {
            client_id: client_id.into(),
            ..Default::default()
        }
    }
}

/// Byte-stream transport to the presence peer.
///
/// Abstracts the platform transport (named pipe or Unix domain socket) so
/// the connection logic can run against a scripted fake in tests. All
/// methods are synchronous; `read_available` must not block waiting for
/// data, it returns whatever has already arrived.
pub trait Transport: Send {
    /// Scans the candidate endpoints and connects to the first that accepts.
    ///
    /// Exhausting the candidate list is reported as
    /// [`IpcError::ConnectionFailed`](super::IpcError::ConnectionFailed);
    /// the caller resolves it by scheduling a retry, not by surfacing it.
    fn connect(&mut self, config: &IpcConfig) -> IpcResult<()>;

    /// Closes the transport. Safe to call when not connected.
    fn disconnect(&mut self) -> IpcResult<()>;

    /// Returns true if the underlying stream is open.
    fn is_open(&self) -> bool;

    /// Writes one encoded frame to the stream.
    fn send(&mut self, bytes: &[u8]) -> IpcResult<()>;

    /// Returns the bytes that have arrived since the last call.
    ///
    /// An empty vector means nothing is pending. A peer close is reported
    /// as [`IpcError::ConnectionClosed`](super::IpcError::ConnectionClosed).
    fn read_available(&mut self) -> IpcResult<Vec<u8>>;
}
