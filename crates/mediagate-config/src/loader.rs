// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mediagate.toml` > `~/.config/mediagate/mediagate.toml` > `/etc/mediagate/mediagate.toml`
//! with environment variable overrides via `MEDIAGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MediagateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mediagate/mediagate.toml` (system-wide)
/// 3. `~/.config/mediagate/mediagate.toml` (user XDG config)
/// 4. `./mediagate.toml` (local directory)
/// 5. `BOT_TOKEN`, `ADMIN_ID`, `PORT` (hosting-platform variables)
/// 6. `MEDIAGATE_*` environment variables
pub fn load_config() -> Result<MediagateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MediagateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MediagateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MediagateConfig::default()))
        .merge(Toml::file("/etc/mediagate/mediagate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mediagate/mediagate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mediagate.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Config sections addressable through `MEDIAGATE_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &["bot", "telegram", "gate", "storage"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEDIAGATE_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`. Only the leading section name is split off.
fn env_provider() -> Env {
    Env::prefixed("MEDIAGATE_").map(|key| {
        // figment keeps the variable's original case.
        let key = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key)
            .into()
    })
}

/// Unprefixed variables set by common hosting platforms.
fn legacy_env_provider() -> Env {
    Env::raw()
        .only(&["BOT_TOKEN", "ADMIN_ID", "PORT"])
        .map(|key| {
            let key = key.as_str();
            if key.eq_ignore_ascii_case("bot_token") {
                "telegram.bot_token".into()
            } else if key.eq_ignore_ascii_case("admin_id") {
                "bot.admin_id".into()
            } else {
                "telegram.listen_port".into()
            }
        })
}
