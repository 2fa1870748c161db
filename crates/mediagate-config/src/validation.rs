// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as channel identifier shape, webhook URL, and listener address.
//! Duplicate channels are tolerated with a warning.

use std::collections::HashSet;

use tracing::warn;

use crate::diagnostic::ConfigError;
use crate::model::MediagateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MediagateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` must be one of {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.catalog_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.catalog_path must not be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (i, channel) in config.gate.channels.iter().enumerate() {
        let channel = channel.trim();
        if channel.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("gate.channels[{i}] must not be empty"),
            });
            continue;
        }

        if !is_valid_channel(channel) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "gate.channels[{i}] `{channel}` must be a public @handle or a numeric chat id"
                ),
            });
        }

        if !seen.insert(channel) {
            warn!(channel, index = i, "duplicate channel in gate.channels is checked once");
        }
    }

    if let Some(url) = &config.telegram.webhook_url {
        match reqwest::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "https" => {}
            Ok(_) => errors.push(ConfigError::Validation {
                message: format!("telegram.webhook_url `{url}` must be an https:// URL"),
            }),
            Err(e) => errors.push(ConfigError::Validation {
                message: format!("telegram.webhook_url `{url}` is not a valid URL: {e}"),
            }),
        }
    }

    if config.telegram.listen_host.parse::<std::net::IpAddr>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.listen_host `{}` is not a valid IP address",
                config.telegram.listen_host
            ),
        });
    }

    if config.telegram.listen_port == 0 {
        errors.push(ConfigError::Validation {
            message: "telegram.listen_port must be non-zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `@handle` with at least one handle character, or a (possibly negative) integer id.
fn is_valid_channel(channel: &str) -> bool {
    match channel.strip_prefix('@') {
        Some(handle) => {
            !handle.is_empty() && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => channel.parse::<i64>().is_ok(),
    }
}
