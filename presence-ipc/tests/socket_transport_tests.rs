// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests against a real Unix domain socket peer.

#![cfg(unix)]

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::thread;
use std::time::Duration;

use presence_ipc::{
    encode_frame, ConnectionState, IpcConfig, Opcode, PipeTransport, Presence, PresenceClient,
};
use serde_json::Value;

fn read_frame(stream: &mut UnixStream) -> (u32, Vec<u8>) {
    let mut header = [0u8; 8];
    stream.read_exact(&mut header).unwrap();
    let opcode = u32::from_le_bytes(header[0..4].try_into().unwrap());
    let length = u32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;
    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).unwrap();
    (opcode, payload)
}

fn config_for(dir: &std::path::Path) -> IpcConfig {
    IpcConfig {
        socket_dir: Some(dir.to_path_buf()),
        ..IpcConfig::new("test-app")
    }
}

#[test]
fn test_handshake_and_presence_over_unix_socket() {
    let dir = tempfile::tempdir().unwrap();
    let listener = UnixListener::bind(dir.path().join("discord-ipc-0")).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();

        let (opcode, payload) = read_frame(&mut stream);
        assert_eq!(opcode, Opcode::Handshake as u32);
        let handshake: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(handshake["v"], 1);
        assert_eq!(handshake["client_id"], "test-app");

        stream
            .write_all(&encode_frame(
                Opcode::Frame,
                br#"{"cmd":"DISPATCH","evt":"READY"}"#,
            ))
            .unwrap();

        let (opcode, payload) = read_frame(&mut stream);
        assert_eq!(opcode, Opcode::Frame as u32);
        let command: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(command["cmd"], "SET_ACTIVITY");
        assert_eq!(command["args"]["activity"]["name"], "Listening");
    });

    let mut client = PresenceClient::new(PipeTransport::new(), config_for(dir.path()));
    client.initialize();
    assert_eq!(client.state(), ConnectionState::HandshakeSent);

    // Give the peer a moment to answer the handshake.
    thread::sleep(Duration::from_millis(200));
    client.on_data_available();
    assert!(client.is_connected());

    client.update_presence(&Presence {
        name: "Listening".into(),
        ..Default::default()
    });

    server.join().unwrap();
    client.shutdown();
}

#[test]
fn test_scan_finds_peer_on_later_slot() {
    let dir = tempfile::tempdir().unwrap();
    // Slots 0..2 are vacant; the peer took slot 3. Binding queues the
    // client connection even before accept, so no server thread is needed.
    let _listener = UnixListener::bind(dir.path().join("discord-ipc-3")).unwrap();

    let mut client = PresenceClient::new(PipeTransport::new(), config_for(dir.path()));
    client.initialize();

    assert_eq!(client.state(), ConnectionState::HandshakeSent);
    assert!(client.reconnect_after().is_none());
}

#[test]
fn test_absent_peer_schedules_reconnect() {
    let dir = tempfile::tempdir().unwrap();

    let mut client = PresenceClient::new(PipeTransport::new(), config_for(dir.path()));
    client.initialize();

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(client.reconnect_after(), Some(Duration::from_millis(500)));
    assert!(!client.is_connected());
}

#[test]
fn test_peer_close_detected_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let listener = UnixListener::bind(dir.path().join("discord-ipc-0")).unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let _ = read_frame(&mut stream);
        // Drop the stream: the client's next read sees an orderly close.
    });

    let mut client = PresenceClient::new(PipeTransport::new(), config_for(dir.path()));
    client.initialize();
    server.join().unwrap();

    thread::sleep(Duration::from_millis(50));
    client.on_data_available();

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(client.reconnect_after().is_some());
}
