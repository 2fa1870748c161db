// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Mediagate.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::HashSet;

use mediagate_core::{ChannelId, UserId};
use serde::{Deserialize, Serialize};

/// Top-level Mediagate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediagateConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Required channels gating delivery.
    #[serde(default)]
    pub gate: GateConfig,

    /// Catalog storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Numeric user id allowed to ingest media. `0` disables ingestion.
    #[serde(default)]
    pub admin_id: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            admin_id: 0,
        }
    }
}

impl BotConfig {
    /// The configured admin, or `None` when ingestion is disabled.
    pub fn admin(&self) -> Option<UserId> {
        (self.admin_id != 0).then_some(UserId(self.admin_id))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Public HTTPS URL Telegram should push updates to. `None` uses long polling.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Address the webhook listener binds to.
    #[serde(default = "default_listen_host")]
    pub listen_host: String,

    /// Port the webhook listener binds to.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            webhook_url: None,
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    10000
}

/// Channel gate configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Channels a user must belong to, checked in this order.
    #[serde(default)]
    pub channels: Vec<String>,
}

impl GateConfig {
    /// Trimmed channels in configured order, keeping the first of any duplicates.
    pub fn required_channels(&self) -> Vec<ChannelId> {
        let mut seen = HashSet::new();
        self.channels
            .iter()
            .map(|c| c.trim())
            .filter(|c| seen.insert(*c))
            .map(|c| ChannelId(c.to_string()))
            .collect()
    }
}

/// Catalog storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the JSON catalog file.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "media_db.json".to_string()
}
