// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Protocol Messages
//!
//! JSON payload construction for the handshake and the `SET_ACTIVITY`
//! command, plus the inbound event shape used for dispatch-ready detection.
//!
//! Field emission is strictly conditional: empty strings, zero timestamps
//! and absent sub-objects never appear on the wire. The peer treats an
//! empty string as a value to render, so emitting one corrupts the
//! displayed activity.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::presence::Presence;

/// Protocol version announced in the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Command value of the dispatch event.
pub const CMD_DISPATCH: &str = "DISPATCH";

/// Event value signaling the session is ready for presence commands.
pub const EVT_READY: &str = "READY";

/// Inbound event envelope.
///
/// Only the two fields needed for ready detection are modeled; everything
/// else the peer sends is ignored. Missing fields default to empty so a
/// partial object still deserializes.
#[derive(Debug, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub cmd: String,
    #[serde(default)]
    pub evt: String,
}

impl InboundEvent {
    /// True if this event marks the session as ready.
    pub fn is_ready(&self) -> bool {
        self.cmd == CMD_DISPATCH && self.evt == EVT_READY
    }
}

/// Builds the handshake payload sent immediately after connecting.
pub fn handshake(client_id: &str) -> Value {
    json!({
        "v": PROTOCOL_VERSION,
        "client_id": client_id,
    })
}

/// Builds the `SET_ACTIVITY` command for a presence snapshot.
///
/// `nonce` correlates the command with the peer's acknowledgment and is
/// emitted as a string. `pid` identifies the host process.
pub fn set_activity(presence: &Presence, nonce: u64, pid: u32) -> Value {
    let mut activity = Map::new();

    if let Some(kind) = presence.activity_type {
        activity.insert("type".into(), json!(kind as u8));
        activity.insert(
            "status_display_type".into(),
            json!(presence.status_display_type as u8),
        );
    }

    if !presence.name.is_empty() {
        activity.insert("name".into(), json!(presence.name));
    }
    if !presence.state.is_empty() {
        activity.insert("state".into(), json!(presence.state));
    }
    if !presence.details.is_empty() {
        activity.insert("details".into(), json!(presence.details));
    }

    if presence.start_timestamp > 0 || presence.end_timestamp > 0 {
        let mut timestamps = Map::new();
        if presence.start_timestamp > 0 {
            timestamps.insert("start".into(), json!(presence.start_timestamp));
        }
        if presence.end_timestamp > 0 {
            timestamps.insert("end".into(), json!(presence.end_timestamp));
        }
        activity.insert("timestamps".into(), Value::Object(timestamps));
    }

    if !presence.large_image_key.is_empty()
        || !presence.large_image_text.is_empty()
        || !presence.small_image_key.is_empty()
        || !presence.small_image_text.is_empty()
    {
        let mut assets = Map::new();
        if !presence.large_image_key.is_empty() {
            assets.insert("large_image".into(), json!(presence.large_image_key));
        }
        if !presence.large_image_text.is_empty() {
            assets.insert("large_text".into(), json!(presence.large_image_text));
        }
        if !presence.small_image_key.is_empty() {
            assets.insert("small_image".into(), json!(presence.small_image_key));
        }
        if !presence.small_image_text.is_empty() {
            assets.insert("small_text".into(), json!(presence.small_image_text));
        }
        activity.insert("assets".into(), Value::Object(assets));
    }

    if !presence.party_id.is_empty()
        || presence.party_size > 0
        || presence.party_max > 0
        || presence.party_privacy > 0
    {
        let mut party = Map::new();
        if !presence.party_id.is_empty() {
            party.insert("id".into(), json!(presence.party_id));
        }
        // A size pair is only meaningful when both ends are known.
        if presence.party_size > 0 && presence.party_max > 0 {
            party.insert(
                "size".into(),
                json!([presence.party_size, presence.party_max]),
            );
        }
        if presence.party_privacy > 0 {
            party.insert("privacy".into(), json!(presence.party_privacy));
        }
        activity.insert("party".into(), Value::Object(party));
    }

    if !presence.match_secret.is_empty()
        || !presence.join_secret.is_empty()
        || !presence.spectate_secret.is_empty()
    {
        let mut secrets = Map::new();
        if !presence.match_secret.is_empty() {
            secrets.insert("match".into(), json!(presence.match_secret));
        }
        if !presence.join_secret.is_empty() {
            secrets.insert("join".into(), json!(presence.join_secret));
        }
        if !presence.spectate_secret.is_empty() {
            secrets.insert("spectate".into(), json!(presence.spectate_secret));
        }
        activity.insert("secrets".into(), Value::Object(secrets));
    }

    activity.insert("instance".into(), json!(presence.instance));

    json!({
        "cmd": "SET_ACTIVITY",
        "nonce": nonce.to_string(),
        "args": {
            "pid": pid,
            "activity": Value::Object(activity),
        },
    })
}
