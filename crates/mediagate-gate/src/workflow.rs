// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request, verification and delivery workflow.
//!
//! Per user the workflow moves through
//! `Idle -> AwaitingConfirmation -> Verifying -> {Fulfilled | Rejected}`:
//!
//! - A code request for a stored code records it as pending and replies with
//!   join links plus a confirmation button.
//! - A confirmation checks every required channel in order, stopping at the
//!   first channel that is not [`MembershipStatus::Member`]. A rejection keeps
//!   the pending entry so the user can retry with the same button.
//! - When every check passes the pending entry is taken, the code is looked
//!   up again, and the media is delivered.
//!
//! Events for the same user are serialized by a per-user lock, so a double
//! tap on the confirmation button delivers at most once.

use std::sync::Arc;

use dashmap::DashMap;
use mediagate_core::{
    Button, ChannelId, IncomingMedia, MediaCode, MediaKind, MembershipOracle, MembershipStatus,
    Transport, UserId,
};
use mediagate_storage::MediaCatalog;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::messages;
use crate::pending::PendingRequests;

/// Trigger tag carried by the confirmation button.
pub const CONFIRM_TRIGGER: &str = "check_subs";

/// An inbound user action, already parsed by the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    Start,
    Help,
    ListChannels,
    WhoAmI,
    UnknownCommand,
    /// `/get <code>`; `code` is `None` when the argument was missing.
    CodeRequest { code: Option<MediaCode> },
    /// The user pressed the confirmation button.
    Confirmation,
    /// `/save <code>` with whatever attachment the message carried.
    Ingest {
        code: Option<MediaCode>,
        media: Option<IncomingMedia>,
    },
}

/// What handling an event did. Returned for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An informational command was answered.
    Replied,
    /// Code request without a code.
    MissingCode,
    CodeNotFound(MediaCode),
    AwaitingConfirmation(MediaCode),
    NoPendingRequest,
    /// Verification stopped at `channel`.
    Rejected {
        channel: ChannelId,
        status: MembershipStatus,
    },
    /// The pending code vanished from the catalog before delivery.
    MediaUnavailable(MediaCode),
    Delivered { code: MediaCode, kind: MediaKind },
    DeliveryFailed(MediaCode),
    Ingested { code: MediaCode, kind: MediaKind },
    /// Ingestion without a code or without a usable attachment.
    IngestRejected,
    IngestFailed(MediaCode),
    /// Non-admin ingestion attempt; nothing was sent.
    Ignored,
}

/// The gate state machine, shared across all users.
pub struct GateWorkflow {
    catalog: Arc<MediaCatalog>,
    pending: PendingRequests,
    oracle: Arc<dyn MembershipOracle>,
    channels: Vec<ChannelId>,
    admin: Option<UserId>,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl GateWorkflow {
    /// Creates a workflow gating on `channels`, checked in the given order.
    ///
    /// `admin` of `None` disables ingestion for everyone.
    pub fn new(
        catalog: Arc<MediaCatalog>,
        oracle: Arc<dyn MembershipOracle>,
        channels: Vec<ChannelId>,
        admin: Option<UserId>,
    ) -> Self {
        Self {
            catalog,
            pending: PendingRequests::new(),
            oracle,
            channels,
            admin,
            user_locks: DashMap::new(),
        }
    }

    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    pub fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admin == Some(user)
    }

    /// Dispatches one inbound event.
    pub async fn handle<T>(&self, user: UserId, event: GateEvent, transport: &T) -> Outcome
    where
        T: Transport + ?Sized,
    {
        let outcome = match event {
            GateEvent::Start => self.reply(transport, user, messages::GREETING).await,
            GateEvent::Help => self.reply(transport, user, messages::HELP).await,
            GateEvent::WhoAmI => self.reply(transport, user, &messages::whoami(user)).await,
            GateEvent::UnknownCommand => {
                self.reply(transport, user, messages::UNKNOWN_COMMAND).await
            }
            GateEvent::ListChannels => self.list_channels(user, transport).await,
            GateEvent::CodeRequest { code } => self.request(user, code, transport).await,
            GateEvent::Confirmation => self.confirm(user, transport).await,
            GateEvent::Ingest { code, media } => self.ingest(user, code, media, transport).await,
        };
        debug!(user_id = %user, ?outcome, "event handled");
        outcome
    }

    /// Handles a code request: validates the code and prompts for membership.
    pub async fn request<T>(&self, user: UserId, code: Option<MediaCode>, transport: &T) -> Outcome
    where
        T: Transport + ?Sized,
    {
        let Some(code) = code else {
            self.send_text(transport, user, messages::GET_USAGE).await;
            return Outcome::MissingCode;
        };

        if self.catalog.get(&code).is_none() {
            debug!(user_id = %user, code = %code, "requested code not in catalog");
            self.send_text(transport, user, &messages::code_not_found(&code))
                .await;
            return Outcome::CodeNotFound(code);
        }

        self.with_user_lock(user, async {
            self.pending.set(user, code.clone());
        })
        .await;
        info!(user_id = %user, code = %code, "code requested, awaiting confirmation");

        let mut buttons = self.join_buttons();
        buttons.push(Button::trigger(messages::CONFIRM_LABEL, CONFIRM_TRIGGER));
        if let Err(e) = transport
            .send_buttons(user, messages::JOIN_PROMPT, &buttons)
            .await
        {
            warn!(user_id = %user, error = %e, "failed to send join prompt");
        }

        Outcome::AwaitingConfirmation(code)
    }

    /// Handles the confirmation trigger: verifies membership and delivers.
    pub async fn confirm<T>(&self, user: UserId, transport: &T) -> Outcome
    where
        T: Transport + ?Sized,
    {
        self.with_user_lock(user, self.confirm_locked(user, transport))
            .await
    }

    async fn confirm_locked<T>(&self, user: UserId, transport: &T) -> Outcome
    where
        T: Transport + ?Sized,
    {
        if self.pending.peek(user).is_none() {
            self.edit(transport, user, messages::NO_PENDING_REQUEST).await;
            return Outcome::NoPendingRequest;
        }

        if let Err((channel, status)) = self.verify(user).await {
            let text = match &status {
                MembershipStatus::Unknown(reason) => {
                    messages::membership_unverifiable(&channel, reason)
                }
                _ => messages::not_a_member(&channel),
            };
            self.edit(transport, user, &text).await;
            return Outcome::Rejected { channel, status };
        }

        let Some(code) = self.pending.take(user) else {
            self.edit(transport, user, messages::NO_PENDING_REQUEST).await;
            return Outcome::NoPendingRequest;
        };

        let Some(record) = self.catalog.get(&code) else {
            warn!(user_id = %user, code = %code, "pending code no longer in catalog");
            self.edit(transport, user, messages::MEDIA_UNAVAILABLE).await;
            return Outcome::MediaUnavailable(code);
        };

        self.edit(transport, user, messages::VERIFIED_SENDING).await;

        match transport.send_media(user, record.kind, &record.handle).await {
            Ok(()) => {
                info!(user_id = %user, code = %code, kind = %record.kind, "media delivered");
                Outcome::Delivered {
                    code,
                    kind: record.kind,
                }
            }
            Err(e) => {
                error!(user_id = %user, code = %code, error = %e, "media delivery failed");
                self.send_text(transport, user, &messages::delivery_failed(&code))
                    .await;
                Outcome::DeliveryFailed(code)
            }
        }
    }

    /// Checks every required channel in order, stopping at the first failure.
    async fn verify(&self, user: UserId) -> Result<(), (ChannelId, MembershipStatus)> {
        for channel in &self.channels {
            let status = self.oracle.check(channel, user).await;
            if status.is_member() {
                debug!(user_id = %user, channel = %channel, "membership confirmed");
                continue;
            }

            if let MembershipStatus::Unknown(reason) = &status {
                warn!(user_id = %user, channel = %channel, reason = %reason, "membership check failed");
            } else {
                debug!(user_id = %user, channel = %channel, "user is not a member");
            }
            return Err((channel.clone(), status));
        }
        Ok(())
    }

    /// Handles an admin ingestion. Non-admin callers get no response at all.
    pub async fn ingest<T>(
        &self,
        user: UserId,
        code: Option<MediaCode>,
        media: Option<IncomingMedia>,
        transport: &T,
    ) -> Outcome
    where
        T: Transport + ?Sized,
    {
        if !self.is_admin(user) {
            debug!(user_id = %user, "ignoring ingestion from non-admin");
            return Outcome::Ignored;
        }

        let Some(code) = code else {
            self.send_text(transport, user, messages::SAVE_USAGE).await;
            return Outcome::IngestRejected;
        };

        let Some(media) = media else {
            self.send_text(transport, user, messages::SAVE_NEEDS_MEDIA)
                .await;
            return Outcome::IngestRejected;
        };

        let kind = media.kind;
        match self.catalog.put(code.clone(), media.into()).await {
            Ok(()) => {
                self.send_text(transport, user, &messages::saved(&code, kind))
                    .await;
                Outcome::Ingested { code, kind }
            }
            Err(e) => {
                error!(code = %code, error = %e, "failed to persist catalog");
                self.send_text(transport, user, &messages::save_failed(&code))
                    .await;
                Outcome::IngestFailed(code)
            }
        }
    }

    async fn list_channels<T>(&self, user: UserId, transport: &T) -> Outcome
    where
        T: Transport + ?Sized,
    {
        if self.channels.is_empty() {
            return self.reply(transport, user, messages::NO_CHANNELS).await;
        }

        if let Err(e) = transport
            .send_buttons(user, messages::CHANNELS_HEADER, &self.join_buttons())
            .await
        {
            warn!(user_id = %user, error = %e, "failed to send channel list");
        }
        Outcome::Replied
    }

    fn join_buttons(&self) -> Vec<Button> {
        self.channels
            .iter()
            .filter_map(|channel| {
                channel
                    .join_url()
                    .map(|url| Button::url(messages::join_label(channel), url))
            })
            .collect()
    }

    /// Runs `fut` while holding `user`'s lock, then drops the lock entry if idle.
    async fn with_user_lock<F: Future>(&self, user: UserId, fut: F) -> F::Output {
        let lock = self
            .user_locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let output = {
            let _guard = lock.lock().await;
            fut.await
        };

        drop(lock);
        self.user_locks
            .remove_if(&user, |_, lock| Arc::strong_count(lock) == 1);
        output
    }

    async fn reply<T>(&self, transport: &T, user: UserId, text: &str) -> Outcome
    where
        T: Transport + ?Sized,
    {
        self.send_text(transport, user, text).await;
        Outcome::Replied
    }

    async fn send_text<T>(&self, transport: &T, user: UserId, text: &str)
    where
        T: Transport + ?Sized,
    {
        if let Err(e) = transport.send_text(user, text).await {
            warn!(user_id = %user, error = %e, "failed to send reply");
        }
    }

    async fn edit<T>(&self, transport: &T, user: UserId, text: &str)
    where
        T: Transport + ?Sized,
    {
        if let Err(e) = transport.edit_prior_message(user, text).await {
            warn!(user_id = %user, error = %e, "failed to update prompt message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediagate_core::{MediaHandle, MediaRecord};
    use mediagate_test_utils::{MemoryStore, MockTransport, ScriptedOracle, Sent};
    use tracing_test::traced_test;

    async fn workflow(channels: &[&str], oracle: Arc<ScriptedOracle>) -> GateWorkflow {
        let store = MemoryStore::with_records([(
            MediaCode::from("12"),
            MediaRecord {
                handle: MediaHandle::from("H1"),
                kind: MediaKind::Video,
            },
        )]);
        let catalog = Arc::new(MediaCatalog::load(Arc::new(store)).await);
        GateWorkflow::new(
            catalog,
            oracle,
            channels.iter().map(|c| ChannelId::from(*c)).collect(),
            Some(UserId(1)),
        )
    }

    #[tokio::test]
    async fn prompt_lists_join_links_then_confirmation() {
        let oracle = Arc::new(ScriptedOracle::all_members());
        let gate = workflow(&["@a", "-100200", "@b"], oracle).await;
        let transport = MockTransport::new();

        gate.request(UserId(9), Some(MediaCode::from("12")), &transport)
            .await;

        let sent = transport.sent().await;
        let Sent::Buttons { buttons, .. } = &sent[0] else {
            panic!("expected a button prompt, got {sent:?}");
        };
        assert_eq!(
            buttons,
            &vec![
                Button::url("Join @a", "https://t.me/a"),
                Button::url("Join @b", "https://t.me/b"),
                Button::trigger(messages::CONFIRM_LABEL, CONFIRM_TRIGGER),
            ]
        );
    }

    #[tokio::test]
    async fn no_required_channels_delivers_immediately() {
        let oracle = Arc::new(ScriptedOracle::all_members());
        let gate = workflow(&[], oracle.clone()).await;
        let transport = MockTransport::new();

        gate.request(UserId(9), Some(MediaCode::from("12")), &transport)
            .await;
        let outcome = gate.confirm(UserId(9), &transport).await;

        assert!(matches!(outcome, Outcome::Delivered { .. }));
        assert!(oracle.queries().await.is_empty());
    }

    #[tokio::test]
    async fn user_lock_entries_are_released() {
        let oracle = Arc::new(ScriptedOracle::all_members());
        let gate = workflow(&["@a"], oracle).await;
        let transport = MockTransport::new();

        gate.request(UserId(9), Some(MediaCode::from("12")), &transport)
            .await;
        gate.confirm(UserId(9), &transport).await;

        assert!(gate.user_locks.is_empty());
    }

    #[tokio::test]
    async fn informational_commands_reply_with_text() {
        let oracle = Arc::new(ScriptedOracle::all_members());
        let gate = workflow(&[], oracle).await;
        let transport = MockTransport::new();

        assert_eq!(
            gate.handle(UserId(5), GateEvent::WhoAmI, &transport).await,
            Outcome::Replied
        );
        gate.handle(UserId(5), GateEvent::ListChannels, &transport)
            .await;

        assert_eq!(
            transport.sent().await,
            vec![
                Sent::Text {
                    user: UserId(5),
                    text: "Your numeric user id: 5".into()
                },
                Sent::Text {
                    user: UserId(5),
                    text: messages::NO_CHANNELS.into()
                },
            ]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn unverifiable_membership_is_logged_with_channel() {
        let oracle = Arc::new(
            ScriptedOracle::all_members()
                .with_status("@a", MembershipStatus::Unknown("chat not found".into())),
        );
        let gate = workflow(&["@a"], oracle).await;
        let transport = MockTransport::new();

        gate.request(UserId(9), Some(MediaCode::from("12")), &transport)
            .await;
        gate.confirm(UserId(9), &transport).await;

        assert!(logs_contain("membership check failed"));
        assert!(logs_contain("chat not found"));
    }

    #[tokio::test]
    async fn stale_pending_code_reports_media_unavailable() {
        let oracle = Arc::new(ScriptedOracle::all_members());
        let gate = workflow(&["@a"], oracle).await;
        let transport = MockTransport::new();

        // Pending entry for a code the catalog does not (or no longer) hold.
        gate.pending().set(UserId(9), MediaCode::from("gone"));
        let outcome = gate.confirm(UserId(9), &transport).await;

        assert_eq!(outcome, Outcome::MediaUnavailable(MediaCode::from("gone")));
        assert!(gate.pending().peek(UserId(9)).is_none());
        assert!(transport.deliveries().await.is_empty());
        assert_eq!(
            transport.last_text().await.as_deref(),
            Some(messages::MEDIA_UNAVAILABLE)
        );
    }
}
