// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.

use mediagate_core::{ChannelId, MediaCode, MediaKind, UserId};

pub const GREETING: &str = "Hi! To get a file, send its code: /get 12\n\
    To see the required channels: /channels\n\
    To see your numeric id: /whoami\n\
    Admins add files by sending a video, GIF or photo with the caption /save 12";

pub const HELP: &str = "/start - start\n\
    /help - this help\n\
    /channels - channels you must join\n\
    /whoami - show your numeric user id\n\
    /get <code> - receive the file stored under a code\n\
    /save <code> - (admin) store the attached file under a code";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /help for the list of commands.";

pub const GET_USAGE: &str = "Please include the file code, for example: /get 2";

pub const SAVE_USAGE: &str =
    "Include the file code, for example send a video with the caption: /save 3";

pub const SAVE_NEEDS_MEDIA: &str = "Send a video, GIF or photo together with the /save command.";

pub const NO_CHANNELS: &str = "No channels are configured.";

pub const CHANNELS_HEADER: &str = "You need to be a member of all of these channels:";

pub const JOIN_PROMPT: &str =
    "To receive the file, join every channel below, then tap \u{201c}I've joined\u{201d}.";

pub const CONFIRM_LABEL: &str = "\u{2705} I've joined";

pub const NO_PENDING_REQUEST: &str = "You have no pending file request. Send /get <code> first.";

pub const VERIFIED_SENDING: &str = "\u{2705} Verified! Sending your file...";

pub const MEDIA_UNAVAILABLE: &str =
    "\u{26d4} That file is no longer available. Ask for another code.";

pub fn join_label(channel: &ChannelId) -> String {
    format!("Join {channel}")
}

pub fn whoami(user: UserId) -> String {
    format!("Your numeric user id: {user}")
}

pub fn code_not_found(code: &MediaCode) -> String {
    format!("\u{26d4} No file is stored under code {code}.")
}

pub fn not_a_member(channel: &ChannelId) -> String {
    format!(
        "\u{26d4} You are not a member of {channel} yet. Join every channel, then tap the button again."
    )
}

pub fn membership_unverifiable(channel: &ChannelId, reason: &str) -> String {
    format!(
        "\u{274c} Could not check your membership in {channel}. \
         The channel must be public and the bot must be a member of it. ({reason})"
    )
}

pub fn saved(code: &MediaCode, kind: MediaKind) -> String {
    format!("\u{2705} Stored the file under code {code}. Type: {kind}")
}

/// The request is already consumed, so the user has to ask again.
pub fn delivery_failed(code: &MediaCode) -> String {
    format!("\u{274c} Sending the file failed. Send /get {code} to request it again.")
}

pub fn save_failed(code: &MediaCode) -> String {
    format!("\u{274c} Could not save code {code}; the catalog was not changed.")
}
