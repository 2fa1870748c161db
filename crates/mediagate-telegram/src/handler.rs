// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command parsing and attachment extraction.
//!
//! Turns Telegram messages and callback queries into channel-agnostic
//! [`GateEvent`]s. Only private chats are handled; commands may arrive as
//! message text or as the caption of a media message (`/save 12` on a video).

use mediagate_core::{IncomingMedia, MediaCode, MediaHandle, MediaKind, UserId};
use mediagate_gate::{CONFIRM_TRIGGER, GateEvent};
use teloxide::types::{CallbackQuery, ChatKind, Message};

/// A recognized bot command with its first argument, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Channels,
    WhoAmI,
    Get(Option<String>),
    Save(Option<String>),
    Unknown,
}

/// Parses `/command[@bot] [arg ...]`.
///
/// Returns `None` for text that is not a command or that addresses a
/// different bot. Only the first whitespace-separated argument is kept.
pub fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let mut words = text.split_whitespace();
    let head = words.next()?.strip_prefix('/')?;

    let name = match head.split_once('@') {
        Some((name, target)) if target.eq_ignore_ascii_case(bot_username) => name,
        Some(_) => return None,
        None => head,
    };
    let arg = words.next().map(str::to_string);

    Some(match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "channels" => Command::Channels,
        "whoami" => Command::WhoAmI,
        "get" => Command::Get(arg),
        "save" => Command::Save(arg),
        _ => Command::Unknown,
    })
}

/// Checks whether the message is from a private (DM) chat.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Extracts the attached media. Animation wins over video, video over photo;
/// for photos the largest size (last in the array) is used.
pub fn extract_media(msg: &Message) -> Option<IncomingMedia> {
    if let Some(animation) = msg.animation() {
        return Some(IncomingMedia {
            kind: MediaKind::Animation,
            handle: MediaHandle(animation.file.id.to_string()),
        });
    }

    if let Some(video) = msg.video() {
        return Some(IncomingMedia {
            kind: MediaKind::Video,
            handle: MediaHandle(video.file.id.to_string()),
        });
    }

    msg.photo()
        .and_then(|sizes| sizes.last())
        .map(|largest| IncomingMedia {
            kind: MediaKind::Photo,
            handle: MediaHandle(largest.file.id.to_string()),
        })
}

/// Maps a private-chat command message to a gate event.
pub fn event_from_message(msg: &Message, bot_username: &str) -> Option<(UserId, GateEvent)> {
    if !is_dm(msg) {
        return None;
    }
    let user = UserId(msg.from.as_ref()?.id.0);
    let text = msg.text().or_else(|| msg.caption())?;

    let event = match parse_command(text, bot_username)? {
        Command::Start => GateEvent::Start,
        Command::Help => GateEvent::Help,
        Command::Channels => GateEvent::ListChannels,
        Command::WhoAmI => GateEvent::WhoAmI,
        Command::Unknown => GateEvent::UnknownCommand,
        Command::Get(code) => GateEvent::CodeRequest {
            code: code.map(MediaCode),
        },
        Command::Save(code) => GateEvent::Ingest {
            code: code.map(MediaCode),
            media: extract_media(msg),
        },
    };
    Some((user, event))
}

/// Maps a press of the confirmation button to a gate event.
pub fn event_from_callback(query: &CallbackQuery) -> Option<(UserId, GateEvent)> {
    (query.data.as_deref() == Some(CONFIRM_TRIGGER))
        .then(|| (UserId(query.from.id.0), GateEvent::Confirmation))
}
