// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mediagate serve`: wires the catalog, the gate workflow, and the
//! Telegram adapter together and runs until shutdown.

use std::sync::Arc;

use mediagate_config::MediagateConfig;
use mediagate_core::error::MediagateError;
use mediagate_gate::GateWorkflow;
use mediagate_storage::{JsonFileStore, MediaCatalog};
use mediagate_telegram::TelegramGate;
use tracing::{info, warn};

pub async fn run_serve(config: MediagateConfig) -> Result<(), MediagateError> {
    init_tracing(&config.bot.log_level);

    let store = Arc::new(JsonFileStore::new(&config.storage.catalog_path));
    let catalog = Arc::new(MediaCatalog::load(store).await);
    info!(
        path = %config.storage.catalog_path,
        entries = catalog.len(),
        "media catalog loaded"
    );

    let admin = config.bot.admin();
    if admin.is_none() {
        warn!("bot.admin_id is not set; /save is disabled");
    }

    let channels = config.gate.required_channels();
    if channels.is_empty() {
        warn!("gate.channels is empty; every request is released without a membership check");
    }

    let gate = TelegramGate::new(config.telegram.clone())?;
    let oracle = Arc::new(gate.membership());
    let workflow = Arc::new(GateWorkflow::new(catalog, oracle, channels, admin));

    info!(
        channels = workflow.channels().len(),
        webhook = config.telegram.webhook_url.is_some(),
        "mediagate starting"
    );
    gate.run(workflow).await?;

    info!("mediagate stopped");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mediagate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
