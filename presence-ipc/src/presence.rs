// SPDX-FileCopyrightText: 2026 Presence IPC Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Presence Value Object
//!
//! The rich-status description the host application asks the peer to
//! display. All fields are optional: empty strings and zero timestamps are
//! omitted from the wire message entirely, because the peer mis-renders
//! activities that carry empty fields.

/// Kind of activity being broadcast.
///
/// Wire values 0 through 5; anything else is not a valid activity kind and
/// is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActivityType {
    Playing = 0,
    Streaming = 1,
    Listening = 2,
    Watching = 3,
    Custom = 4,
    Competing = 5,
}

/// Which presence field the peer shows as the one-line status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StatusDisplayType {
    #[default]
    Name = 0,
    State = 1,
    Details = 2,
}

/// A presence snapshot.
///
/// Owned by the caller and only read by the client; nothing is retained
/// after [`update_presence`](crate::ipc::PresenceClient::update_presence)
/// returns. `Default` gives the all-empty value used by `clear_presence`.
#[derive(Debug, Clone, Default)]
pub struct Presence {
    /// Activity kind. `None` omits both `type` and `status_display_type`.
    pub activity_type: Option<ActivityType>,
    /// Emitted together with `activity_type`.
    pub status_display_type: StatusDisplayType,
    /// Activity name shown as the headline.
    pub name: String,
    /// Second status line.
    pub state: String,
    /// Third status line.
    pub details: String,
    /// Activity start, epoch seconds. Zero means absent.
    pub start_timestamp: i64,
    /// Activity end, epoch seconds. Zero means absent.
    pub end_timestamp: i64,
    /// Large image asset key.
    pub large_image_key: String,
    /// Hover text for the large image.
    pub large_image_text: String,
    /// Small image asset key.
    pub small_image_key: String,
    /// Hover text for the small image.
    pub small_image_text: String,
    /// Party identifier.
    pub party_id: String,
    /// Current party size. Emitted only when `party_max` is also positive.
    pub party_size: i32,
    /// Maximum party size. Emitted only when `party_size` is also positive.
    pub party_max: i32,
    /// Party privacy level. Emitted when positive.
    pub party_privacy: i32,
    /// Match secret.
    pub match_secret: String,
    /// Join secret.
    pub join_secret: String,
    /// Spectate secret.
    pub spectate_secret: String,
    /// Whether this is an instanced session. Always emitted.
    pub instance: bool,
}
