// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the catalog, the gate workflow, and adapters.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable numeric identity of a user on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator-chosen key identifying one stored media item.
///
/// Codes are case-sensitive and carry no formatting constraints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaCode(pub String);

impl MediaCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque transport-level reference to a previously received file.
///
/// Produced by the platform when the file was uploaded; it cannot be
/// re-derived and must be stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(pub String);

impl MediaHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of stored media; selects the delivery operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Animation,
    Video,
    Photo,
}

/// A catalog entry: the stored handle and its kind.
///
/// Keyed by [`MediaCode`] in the catalog, so every code maps to exactly one
/// handle and one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "file_id")]
    pub handle: MediaHandle,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// A media attachment found on an inbound ingestion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMedia {
    pub kind: MediaKind,
    pub handle: MediaHandle,
}

impl From<IncomingMedia> for MediaRecord {
    fn from(media: IncomingMedia) -> Self {
        Self {
            handle: media.handle,
            kind: media.kind,
        }
    }
}

/// Identifier of a required channel: a public `@handle` or a numeric chat id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public join link for `@handle` channels; numeric ids have none.
    pub fn join_url(&self) -> Option<String> {
        self.0
            .strip_prefix('@')
            .filter(|handle| !handle.is_empty())
            .map(|handle| format!("https://t.me/{handle}"))
    }

    /// Numeric chat id, if the channel is configured by id rather than handle.
    pub fn numeric_id(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Result of asking the platform whether a user belongs to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipStatus {
    /// The user is currently in the channel.
    Member,
    /// The user is not in the channel (left, banned, restricted, never joined).
    NotMember,
    /// Membership could not be determined; carries the reason.
    Unknown(String),
}

impl MembershipStatus {
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Member)
    }
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Opens an external link.
    Url(String),
    /// Sends a trigger tag back to the bot.
    Trigger(String),
}

/// A labelled button attached to an outbound message. One button per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    pub fn trigger(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Trigger(tag.into()),
        }
    }
}
