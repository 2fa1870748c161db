// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline commands: `check-config` and `catalog list`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use mediagate_config::MediagateConfig;
use mediagate_core::error::MediagateError;
use mediagate_core::types::{MediaCode, MediaRecord};
use mediagate_storage::{JsonFileStore, MediaCatalog};

/// Human-readable summary of a validated configuration.
pub fn config_summary(config: &MediagateConfig) -> String {
    let mut out = String::from("configuration OK\n");

    let channels = config.gate.required_channels();
    if channels.is_empty() {
        out.push_str("  required channels: none\n");
    } else {
        out.push_str("  required channels:\n");
        for channel in &channels {
            let _ = writeln!(out, "    - {channel}");
        }
    }

    let admin = match config.bot.admin() {
        Some(admin) => admin.to_string(),
        None => "not set (ingestion disabled)".to_string(),
    };
    let _ = writeln!(out, "  admin: {admin}");
    let _ = writeln!(out, "  catalog: {}", config.storage.catalog_path);

    let transport = match &config.telegram.webhook_url {
        Some(url) => format!(
            "webhook {url} (listening on {}:{})",
            config.telegram.listen_host, config.telegram.listen_port
        ),
        None => "long polling".to_string(),
    };
    let _ = writeln!(out, "  transport: {transport}");

    if config.telegram.bot_token.is_none() {
        out.push_str("  warning: telegram.bot_token is not set; `serve` will refuse to start\n");
    }
    out
}

/// One line per stored code, sorted by code.
pub fn render_catalog(records: &BTreeMap<MediaCode, MediaRecord>) -> String {
    if records.is_empty() {
        return "catalog is empty\n".to_string();
    }

    let width = records.keys().map(|code| code.as_str().len()).max().unwrap_or(0);
    let mut out = String::new();
    for (code, record) in records {
        let _ = writeln!(out, "{:<width$}  {}", code.as_str(), record.kind);
    }
    let _ = writeln!(out, "{} entries", records.len());
    out
}

pub async fn list_catalog(config: &MediagateConfig) -> Result<(), MediagateError> {
    let store = Arc::new(JsonFileStore::new(&config.storage.catalog_path));
    let catalog = MediaCatalog::load(store).await;
    print!("{}", render_catalog(&catalog.snapshot()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediagate_core::types::{MediaHandle, MediaKind};

    fn record(handle: &str, kind: MediaKind) -> MediaRecord {
        MediaRecord {
            handle: MediaHandle::from(handle),
            kind,
        }
    }

    #[test]
    fn summary_reports_channels_and_admin() {
        let config = mediagate_config::load_and_validate_str(
            r#"
[bot]
admin_id = 99

[telegram]
bot_token = "123:abc"

[gate]
channels = ["@news", "-1001234567890"]
"#,
        )
        .unwrap();

        let summary = config_summary(&config);
        assert!(summary.contains("- @news"));
        assert!(summary.contains("- -1001234567890"));
        assert!(summary.contains("admin: 99"));
        assert!(summary.contains("long polling"));
        assert!(!summary.contains("warning"));
    }

    #[test]
    fn summary_flags_missing_admin_and_token() {
        let config = mediagate_config::load_and_validate_str("").unwrap();
        let summary = config_summary(&config);
        assert!(summary.contains("required channels: none"));
        assert!(summary.contains("ingestion disabled"));
        assert!(summary.contains("bot_token is not set"));
    }

    #[test]
    fn summary_describes_webhook_mode() {
        let config = mediagate_config::load_and_validate_str(
            r#"
[telegram]
webhook_url = "https://gate.example.com/hook"
listen_port = 8443
"#,
        )
        .unwrap();
        let summary = config_summary(&config);
        assert!(summary.contains("webhook https://gate.example.com/hook"));
        assert!(summary.contains(":8443"));
    }

    #[test]
    fn catalog_listing_is_sorted_by_code() {
        let mut records = BTreeMap::new();
        records.insert(MediaCode::from("b"), record("H2", MediaKind::Photo));
        records.insert(MediaCode::from("a"), record("H1", MediaKind::Video));

        let listing = render_catalog(&records);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines, vec!["a  video", "b  photo", "2 entries"]);
    }

    #[test]
    fn empty_catalog_listing() {
        assert_eq!(render_catalog(&BTreeMap::new()), "catalog is empty\n");
    }
}
