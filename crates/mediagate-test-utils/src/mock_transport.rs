// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport that captures outbound messages for assertions.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mediagate_core::{Button, MediaHandle, MediaKind, MediagateError, Transport, UserId};
use tokio::sync::Mutex;

/// One captured outbound operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        user: UserId,
        text: String,
    },
    Buttons {
        user: UserId,
        text: String,
        buttons: Vec<Button>,
    },
    Media {
        user: UserId,
        kind: MediaKind,
        handle: MediaHandle,
    },
    Edit {
        user: UserId,
        text: String,
    },
}

impl Sent {
    /// The text of a text, button or edit message.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } | Self::Buttons { text, .. } | Self::Edit { text, .. } => {
                Some(text)
            }
            Self::Media { .. } => None,
        }
    }
}

/// A transport for testing.
///
/// Every call is appended to an in-memory log retrievable via [`sent()`](Self::sent).
/// Media delivery fails while [`fail_media`](Self::fail_media) is set;
/// a failed delivery is not logged as sent.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<Sent>>,
    fail_media: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `send_media` calls fail (or succeed again).
    pub fn fail_media(&self, fail: bool) {
        self.fail_media.store(fail, Ordering::SeqCst);
    }

    /// Get everything sent so far.
    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    /// Media deliveries only.
    pub async fn deliveries(&self) -> Vec<(UserId, MediaKind, MediaHandle)> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|s| match s {
                Sent::Media { user, kind, handle } => Some((*user, *kind, handle.clone())),
                _ => None,
            })
            .collect()
    }

    /// The most recent message text, if any.
    pub async fn last_text(&self) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find_map(|s| s.text().map(str::to_string))
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_text(&self, user: UserId, text: &str) -> Result<(), MediagateError> {
        self.sent.lock().await.push(Sent::Text {
            user,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), MediagateError> {
        self.sent.lock().await.push(Sent::Buttons {
            user,
            text: text.to_string(),
            buttons: buttons.to_vec(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        user: UserId,
        kind: MediaKind,
        handle: &MediaHandle,
    ) -> Result<(), MediagateError> {
        if self.fail_media.load(Ordering::SeqCst) {
            return Err(MediagateError::Channel {
                message: "wrong file identifier specified".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(Sent::Media {
            user,
            kind,
            handle: handle.clone(),
        });
        Ok(())
    }

    async fn edit_prior_message(&self, user: UserId, text: &str) -> Result<(), MediagateError> {
        self.sent.lock().await.push(Sent::Edit {
            user,
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_calls_in_order() {
        let transport = MockTransport::new();
        transport.send_text(UserId(1), "hello").await.unwrap();
        transport.edit_prior_message(UserId(1), "edited").await.unwrap();

        assert_eq!(transport.sent().await.len(), 2);
        assert_eq!(transport.last_text().await.as_deref(), Some("edited"));
    }

    #[tokio::test]
    async fn failing_media_is_not_recorded() {
        let transport = MockTransport::new();
        transport.fail_media(true);
        let result = transport
            .send_media(UserId(1), MediaKind::Photo, &MediaHandle::from("H"))
            .await;
        assert!(result.is_err());
        assert!(transport.deliveries().await.is_empty());
    }
}
