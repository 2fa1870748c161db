// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user pending code requests.

use dashmap::DashMap;
use mediagate_core::{MediaCode, UserId};

/// The code each user most recently asked for.
///
/// At most one entry per user; a new request replaces the old one. Entries
/// have no expiry and live until replaced or taken on fulfillment.
#[derive(Debug, Default)]
pub struct PendingRequests {
    entries: DashMap<UserId, MediaCode>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `code` for `user`, replacing any earlier request.
    pub fn set(&self, user: UserId, code: MediaCode) {
        self.entries.insert(user, code);
    }

    pub fn peek(&self, user: UserId) -> Option<MediaCode> {
        self.entries.get(&user).map(|entry| entry.value().clone())
    }

    /// Removes and returns the pending code for `user`.
    pub fn take(&self, user: UserId) -> Option<MediaCode> {
        self.entries.remove(&user).map(|(_, code)| code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
