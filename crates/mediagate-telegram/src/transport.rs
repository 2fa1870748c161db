// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`Transport`] implementation over the Telegram Bot API.

use async_trait::async_trait;
use mediagate_core::error::MediagateError;
use mediagate_core::traits::Transport;
use mediagate_core::types::{Button, ButtonAction, MediaHandle, MediaKind, UserId};
use teloxide::RequestError;
use teloxide::prelude::*;
use teloxide::types::{
    FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId,
};
use tracing::{debug, warn};

/// Telegram transport scoped to one inbound update.
///
/// When the update was a button press, `prompt` points at the message that
/// carried the button so [`Transport::edit_prior_message`] can rewrite it.
pub struct TelegramTransport {
    bot: Bot,
    prompt: Option<(ChatId, MessageId)>,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot, prompt: None }
    }

    pub fn with_prompt(bot: Bot, prompt: Option<(ChatId, MessageId)>) -> Self {
        Self { bot, prompt }
    }
}

fn chat_for(user: UserId) -> Result<ChatId, MediagateError> {
    i64::try_from(user.0)
        .map(ChatId)
        .map_err(|_| MediagateError::Channel {
            message: format!("user id {user} does not fit a chat id"),
            source: None,
        })
}

fn channel_error(action: &str, e: RequestError) -> MediagateError {
    MediagateError::Channel {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Telegram rejects edits that would leave the text unchanged.
fn is_not_modified(e: &RequestError) -> bool {
    e.to_string().contains("message is not modified")
}

/// Builds an inline keyboard with one button per row.
///
/// Link buttons whose URL does not parse are dropped with a warning.
pub fn keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .iter()
        .filter_map(|button| match &button.action {
            ButtonAction::Url(raw) => match reqwest::Url::parse(raw) {
                Ok(url) => Some(InlineKeyboardButton::url(button.label.clone(), url)),
                Err(e) => {
                    warn!(url = %raw, error = %e, "skipping link button with invalid url");
                    None
                }
            },
            ButtonAction::Trigger(tag) => Some(InlineKeyboardButton::callback(
                button.label.clone(),
                tag.clone(),
            )),
        })
        .map(|button| vec![button])
        .collect();
    InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, user: UserId, text: &str) -> Result<(), MediagateError> {
        let chat = chat_for(user)?;
        self.bot
            .send_message(chat, text)
            .await
            .map_err(|e| channel_error("send message", e))?;
        Ok(())
    }

    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), MediagateError> {
        let chat = chat_for(user)?;
        self.bot
            .send_message(chat, text)
            .reply_markup(keyboard(buttons))
            .await
            .map_err(|e| channel_error("send prompt", e))?;
        Ok(())
    }

    async fn send_media(
        &self,
        user: UserId,
        kind: MediaKind,
        handle: &MediaHandle,
    ) -> Result<(), MediagateError> {
        let chat = chat_for(user)?;
        let file = InputFile::file_id(FileId(handle.as_str().to_string()));

        let sent = match kind {
            MediaKind::Animation => self.bot.send_animation(chat, file).await.map(|_| ()),
            MediaKind::Video => self.bot.send_video(chat, file).await.map(|_| ()),
            MediaKind::Photo => self.bot.send_photo(chat, file).await.map(|_| ()),
        };
        sent.map_err(|e| channel_error(&format!("send {kind}"), e))
    }

    async fn edit_prior_message(&self, user: UserId, text: &str) -> Result<(), MediagateError> {
        let Some((chat, message_id)) = self.prompt else {
            return self.send_text(user, text).await;
        };

        match self.bot.edit_message_text(chat, message_id, text).await {
            Ok(_) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!(chat_id = chat.0, "prompt already shows this text");
                Ok(())
            }
            Err(e) => Err(channel_error("edit prompt", e)),
        }
    }
}
