// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Platform Transport
//!
//! Real transport implementation: Unix domain sockets on Unix-like systems,
//! named pipes on Windows. Connection is a scan over the candidate endpoint
//! list; reads are non-blocking so the reactor-driven client never stalls.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::endpoint;
use super::error::{IpcError, IpcResult};
use super::transport::{IpcConfig, Transport};

#[cfg(unix)]
type PipeStream = std::os::unix::net::UnixStream;
#[cfg(windows)]
type PipeStream = std::fs::File;

const READ_CHUNK_SIZE: usize = 4096;

/// Transport over the platform-local pipe or socket.
#[derive(Debug, Default)]
pub struct PipeTransport {
    stream: Option<PipeStream>,
}

impl PipeTransport {
    /// Creates a disconnected transport.
    pub fn new() -> Self {
        PipeTransport { stream: None }
    }

    fn candidates(config: &IpcConfig) -> Vec<PathBuf> {
        #[cfg(unix)]
        if let Some(dir) = &config.socket_dir {
            return endpoint::candidate_paths_in(std::slice::from_ref(dir), &config.pipe_base);
        }
        endpoint::candidate_paths(&config.pipe_base)
    }
}

/// Opens a Unix domain socket endpoint.
///
/// `std` has no connect timeout for local sockets; a connect normally
/// completes or is refused immediately. Residual risk: a stale socket whose
/// listener has a full accept backlog can hold the connect past the
/// per-candidate bound until the kernel gives up. The stream is switched to
/// non-blocking before use.
#[cfg(unix)]
fn open_endpoint(path: &Path, _timeout: Duration) -> std::io::Result<PipeStream> {
    let stream = std::os::unix::net::UnixStream::connect(path)?;
    stream.set_nonblocking(true)?;
    Ok(stream)
}

/// Opens a named pipe endpoint.
///
/// A pipe that exists but has no free server instance reports busy; retry
/// until the per-candidate timeout expires, then move on to the next slot.
#[cfg(windows)]
fn open_endpoint(path: &Path, timeout: Duration) -> std::io::Result<PipeStream> {
    const ERROR_PIPE_BUSY: i32 = 231;

    let deadline = std::time::Instant::now() + timeout;
    loop {
        match std::fs::OpenOptions::new().read(true).write(true).open(path) {
            Ok(pipe) => return Ok(pipe),
            Err(e)
                if e.raw_os_error() == Some(ERROR_PIPE_BUSY)
                    && std::time::Instant::now() < deadline =>
            {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(e),
        }
    }
}

impl Transport for PipeTransport {
    fn connect(&mut self, config: &IpcConfig) -> IpcResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let timeout = Duration::from_millis(config.connect_timeout_ms);
        for path in Self::candidates(config) {
            match open_endpoint(&path, timeout) {
                Ok(stream) => {
                    debug!(path = %path.display(), "connected to presence endpoint");
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(_) => continue, // Slot not listening, try the next one
            }
        }

        Err(IpcError::ConnectionFailed(
            "no presence endpoint accepted the connection".into(),
        ))
    }

    fn disconnect(&mut self) -> IpcResult<()> {
        // Dropping the stream closes it; there is no protocol-level goodbye
        // beyond the Close opcode the peer may have already sent.
        self.stream = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn send(&mut self, bytes: &[u8]) -> IpcResult<()> {
        let stream = self.stream.as_mut().ok_or(IpcError::NotConnected)?;
        stream
            .write_all(bytes)
            .and_then(|_| stream.flush())
            .map_err(|e| IpcError::SendFailed(e.to_string()))
    }

    #[cfg(unix)]
    fn read_available(&mut self) -> IpcResult<Vec<u8>> {
        let stream = self.stream.as_mut().ok_or(IpcError::NotConnected)?;

        let mut out = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    // Orderly close. Deliver what we already have; the next
                    // read reports the closure.
                    if out.is_empty() {
                        return Err(IpcError::ConnectionClosed);
                    }
                    return Ok(out);
                }
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(out),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(IpcError::ReceiveFailed(e.to_string())),
            }
        }
    }

    #[cfg(windows)]
    fn read_available(&mut self) -> IpcResult<Vec<u8>> {
        // The reactor only signals this transport when the pipe has data,
        // so a single read does not stall the caller.
        let stream = self.stream.as_mut().ok_or(IpcError::NotConnected)?;

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match stream.read(&mut chunk) {
            Ok(0) => Err(IpcError::ConnectionClosed),
            Ok(n) => Ok(chunk[..n].to_vec()),
            Err(e) => Err(IpcError::ReceiveFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transport_is_closed() {
        let transport = PipeTransport::new();
        assert!(!transport.is_open());
    }

    #[test]
    fn test_send_without_connect_fails() {
        let mut transport = PipeTransport::new();
        assert!(matches!(transport.send(b"x"), Err(IpcError::NotConnected)));
    }

    #[test]
    fn test_read_without_connect_fails() {
        let mut transport = PipeTransport::new();
        assert!(matches!(
            transport.read_available(),
            Err(IpcError::NotConnected)
        ));
    }

    #[test]
    fn test_disconnect_when_not_connected_ok() {
        let mut transport = PipeTransport::new();
        assert!(transport.disconnect().is_ok());
        assert!(!transport.is_open());
    }

    #[cfg(unix)]
    #[test]
    fn test_connect_with_no_listener_exhausts_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let config = IpcConfig {
            socket_dir: Some(dir.path().to_path_buf()),
            ..IpcConfig::new("test-app")
        };

        let mut transport = PipeTransport::new();
        let result = transport.connect(&config);
        assert!(matches!(result, Err(IpcError::ConnectionFailed(_))));
        assert!(!transport.is_open());
    }
}
