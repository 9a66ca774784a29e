//! IPC error types.

use thiserror::Error;

/// Result type for IPC operations.
pub type IpcResult<T> = Result<T, IpcError>;

/// Errors raised by the transport and frame layers.
///
/// None of these reach the public presence calls; they are consumed by the
/// reconnect loop inside [`PresenceClient`](super::PresenceClient).
#[derive(Error, Debug)]
pub enum IpcError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Frame length {length} exceeds limit of {max} bytes")]
    FrameTooLarge { length: usize, max: usize },
}
