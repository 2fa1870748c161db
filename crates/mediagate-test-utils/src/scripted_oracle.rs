// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Membership oracle with scripted answers.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use mediagate_core::{ChannelId, MembershipOracle, MembershipStatus, UserId};
use tokio::sync::Mutex;

/// Answers membership checks from a per-channel table.
///
/// Channels without an entry answer with the default status. Every query is
/// logged so tests can assert which channels were checked and in what order.
pub struct ScriptedOracle {
    default: MembershipStatus,
    latency: Option<Duration>,
    statuses: std::sync::Mutex<HashMap<ChannelId, MembershipStatus>>,
    queries: Mutex<Vec<(ChannelId, UserId)>>,
}

impl ScriptedOracle {
    /// An oracle that reports every user as a member of every channel.
    pub fn all_members() -> Self {
        Self::with_default(MembershipStatus::Member)
    }

    pub fn with_default(default: MembershipStatus) -> Self {
        Self {
            default,
            latency: None,
            statuses: std::sync::Mutex::new(HashMap::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Makes every check sleep for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Builder form of [`set_status`](Self::set_status).
    pub fn with_status(self, channel: &str, status: MembershipStatus) -> Self {
        self.set_status(channel, status);
        self
    }

    /// Changes the answer for `channel` from now on.
    pub fn set_status(&self, channel: &str, status: MembershipStatus) {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(ChannelId::from(channel), status);
    }

    /// All queries made so far, in order.
    pub async fn queries(&self) -> Vec<(ChannelId, UserId)> {
        self.queries.lock().await.clone()
    }

    /// Channels queried so far, in order.
    pub async fn queried_channels(&self) -> Vec<String> {
        self.queries
            .lock()
            .await
            .iter()
            .map(|(channel, _)| channel.0.clone())
            .collect()
    }
}

#[async_trait]
impl MembershipOracle for ScriptedOracle {
    async fn check(&self, channel: &ChannelId, user: UserId) -> MembershipStatus {
        self.queries.lock().await.push((channel.clone(), user));
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(channel)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}
