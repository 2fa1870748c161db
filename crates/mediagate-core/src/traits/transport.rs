// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging operations used by the gate workflow.

use async_trait::async_trait;

use crate::error::MediagateError;
use crate::types::{Button, MediaHandle, MediaKind, UserId};

/// Sends replies to a user on the messaging platform.
///
/// A transport is scoped to the inbound event being handled, which is how
/// [`edit_prior_message`](Transport::edit_prior_message) knows which message
/// to edit.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, user: UserId, text: &str) -> Result<(), MediagateError>;

    /// Sends a text message with one button per row.
    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), MediagateError>;

    /// Delivers a stored media item using the operation selected by `kind`.
    async fn send_media(
        &self,
        user: UserId,
        kind: MediaKind,
        handle: &MediaHandle,
    ) -> Result<(), MediagateError>;

    /// Replaces the text of the message that carried the triggering button.
    ///
    /// Falls back to a new message when there is no prior message to edit.
    async fn edit_prior_message(&self, user: UserId, text: &str) -> Result<(), MediagateError>;
}
