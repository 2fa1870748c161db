// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel membership lookups via `getChatMember`.

use async_trait::async_trait;
use mediagate_core::traits::MembershipOracle;
use mediagate_core::types::{ChannelId, MembershipStatus, UserId};
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, Recipient, UserId as TelegramUserId};
use tracing::{debug, warn};

/// Asks Telegram whether a user belongs to a channel.
///
/// The bot must be able to see the channel's member list, which in practice
/// means it has to be an administrator there.
pub struct TelegramMembership {
    bot: Bot,
}

impl TelegramMembership {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Maps a `@handle` to a username recipient and a numeric id to a chat id.
pub fn recipient_for(channel: &ChannelId) -> Recipient {
    match channel.numeric_id() {
        Some(id) => Recipient::Id(ChatId(id)),
        None => Recipient::ChannelUsername(channel.as_str().to_string()),
    }
}

/// Owners, administrators, and plain members count; everything else
/// (left, banned, restricted) does not.
pub fn classify(kind: &ChatMemberKind) -> MembershipStatus {
    match kind {
        ChatMemberKind::Owner { .. }
        | ChatMemberKind::Administrator { .. }
        | ChatMemberKind::Member { .. } => MembershipStatus::Member,
        _ => MembershipStatus::NotMember,
    }
}

#[async_trait]
impl MembershipOracle for TelegramMembership {
    async fn check(&self, channel: &ChannelId, user: UserId) -> MembershipStatus {
        match self
            .bot
            .get_chat_member(recipient_for(channel), TelegramUserId(user.0))
            .await
        {
            Ok(member) => {
                let status = classify(&member.kind);
                debug!(%channel, user_id = %user, ?status, "membership checked");
                status
            }
            Err(e) => {
                warn!(%channel, user_id = %user, error = %e, "membership check failed");
                MembershipStatus::Unknown(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::ChatMember;

    fn member_kind(json: serde_json::Value) -> ChatMemberKind {
        let mut value = json;
        value.as_object_mut().unwrap().insert(
            "user".into(),
            serde_json::json!({"id": 42, "is_bot": false, "first_name": "Test"}),
        );
        let member: ChatMember =
            serde_json::from_value(value).expect("failed to deserialize chat member");
        member.kind
    }

    #[test]
    fn handles_become_username_recipients() {
        assert_eq!(
            recipient_for(&ChannelId::from("@news")),
            Recipient::ChannelUsername("@news".into())
        );
    }

    #[test]
    fn numeric_ids_become_chat_recipients() {
        assert_eq!(
            recipient_for(&ChannelId::from("-1001234567890")),
            Recipient::Id(ChatId(-1001234567890))
        );
    }

    #[test]
    fn members_and_owners_count() {
        assert_eq!(
            classify(&member_kind(serde_json::json!({"status": "member"}))),
            MembershipStatus::Member
        );
        assert_eq!(
            classify(&member_kind(
                serde_json::json!({"status": "creator", "is_anonymous": false})
            )),
            MembershipStatus::Member
        );
    }

    #[test]
    fn departed_and_banned_users_do_not_count() {
        assert_eq!(
            classify(&member_kind(serde_json::json!({"status": "left"}))),
            MembershipStatus::NotMember
        );
        assert_eq!(
            classify(&member_kind(
                serde_json::json!({"status": "kicked", "until_date": 0})
            )),
            MembershipStatus::NotMember
        );
    }
}
