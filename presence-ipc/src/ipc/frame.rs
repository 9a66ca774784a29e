// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Frame Codec
//!
//! Wire framing for the presence IPC protocol: an 8-byte header (opcode and
//! payload length, both u32 little-endian) followed by the payload bytes.
//! The transport is connection-oriented and assumed reliable, so there is no
//! checksum or escaping; loss shows up as disconnection, not corruption.

use super::error::{IpcError, IpcResult};

/// Size of the frame header: opcode (4 bytes LE) + length (4 bytes LE).
pub const FRAME_HEADER_SIZE: usize = 8;

/// Default upper bound for a declared payload length.
///
/// The peer never sends frames anywhere near this size; a larger declared
/// length means the stream is corrupt or hostile and the connection should
/// be dropped rather than buffering indefinitely.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Frame opcodes understood by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl Opcode {
    /// Maps a raw header value to a known opcode.
    ///
    /// Unknown values return `None`; the dispatch layer ignores them.
    pub fn from_u32(raw: u32) -> Option<Opcode> {
        match raw {
            0 => Some(Opcode::Handshake),
            1 => Some(Opcode::Frame),
            2 => Some(Opcode::Close),
            3 => Some(Opcode::Ping),
            4 => Some(Opcode::Pong),
            _ => None,
        }
    }
}

/// A decoded frame as it came off the wire.
///
/// The opcode is kept raw so unknown values survive decoding and can be
/// ignored by the dispatcher instead of failing the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub opcode: u32,
    pub payload: Vec<u8>,
}

/// Encodes a frame: header followed by the payload, no trailer.
pub fn encode_frame(opcode: Opcode, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&(opcode as u32).to_le_bytes());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Incremental frame decoder over an owned receive buffer.
///
/// Bytes arrive with arbitrary granularity: a frame may be split across many
/// reads, and several frames may be coalesced into one. [`extend`] appends
/// whatever arrived; [`next_frame`] drains complete frames from the front,
/// leaving partial trailing bytes for the next read.
///
/// [`extend`]: FrameDecoder::extend
/// [`next_frame`]: FrameDecoder::next_frame
#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    max_frame_size: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Creates a decoder with the default frame size limit.
    pub fn new() -> Self {
        Self::with_max_frame_size(MAX_FRAME_SIZE)
    }

    /// Creates a decoder with a custom frame size limit.
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        FrameDecoder {
            buffer: Vec::new(),
            max_frame_size,
        }
    }

    /// Appends newly received bytes to the buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Extracts the next complete frame, if one is buffered.
    ///
    /// Returns `Ok(None)` when fewer than a full header-plus-payload is
    /// available; this is the partial-frame wait state, not an error, and
    /// the buffered bytes are left untouched. A declared length above the
    /// limit returns [`IpcError::FrameTooLarge`]; the caller should treat
    /// that like a transport failure and reconnect.
    pub fn next_frame(&mut self) -> IpcResult<Option<RawFrame>> {
        if self.buffer.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        let mut word = [0u8; 4];
        word.copy_from_slice(&self.buffer[0..4]);
        let opcode = u32::from_le_bytes(word);
        word.copy_from_slice(&self.buffer[4..8]);
        let length = u32::from_le_bytes(word) as usize;

        if length > self.max_frame_size {
            return Err(IpcError::FrameTooLarge {
                length,
                max: self.max_frame_size,
            });
        }

        if self.buffer.len() < FRAME_HEADER_SIZE + length {
            return Ok(None); // Wait for more data
        }

        let payload = self.buffer[FRAME_HEADER_SIZE..FRAME_HEADER_SIZE + length].to_vec();
        self.buffer.drain(..FRAME_HEADER_SIZE + length);

        Ok(Some(RawFrame { opcode, payload }))
    }

    /// Discards all buffered bytes. Called when the connection drops.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
