// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end workflow testing.
//!
//! `TestHarness` wires a [`GateWorkflow`] to a [`MemoryStore`]-backed
//! catalog, a [`ScriptedOracle`] and a [`MockTransport`], and exposes one
//! method per inbound event.

use std::sync::Arc;
use std::time::Duration;

use mediagate_core::{
    ChannelId, IncomingMedia, MediaCode, MediaHandle, MediaKind, MediaRecord, MembershipStatus,
    UserId,
};
use mediagate_gate::{GateEvent, GateWorkflow, Outcome};
use mediagate_storage::MediaCatalog;

use crate::memory_store::MemoryStore;
use crate::mock_transport::MockTransport;
use crate::scripted_oracle::ScriptedOracle;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    channels: Vec<String>,
    media: Vec<(MediaCode, MediaRecord)>,
    admin: Option<UserId>,
    statuses: Vec<(String, MembershipStatus)>,
    latency: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            channels: Vec::new(),
            media: Vec::new(),
            admin: None,
            statuses: Vec::new(),
            latency: None,
        }
    }

    /// Set the required channels, in evaluation order.
    pub fn with_channels(mut self, channels: &[&str]) -> Self {
        self.channels = channels.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Pre-populate the catalog.
    pub fn with_media(mut self, code: &str, handle: &str, kind: MediaKind) -> Self {
        self.media.push((
            MediaCode::from(code),
            MediaRecord {
                handle: MediaHandle::from(handle),
                kind,
            },
        ));
        self
    }

    pub fn with_admin(mut self, admin: u64) -> Self {
        self.admin = Some(UserId(admin));
        self
    }

    /// Script the oracle's answer for one channel; others answer `Member`.
    pub fn with_status(mut self, channel: &str, status: MembershipStatus) -> Self {
        self.statuses.push((channel.to_string(), status));
        self
    }

    /// Delay every membership check, to let concurrent events interleave.
    pub fn with_oracle_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn build(self) -> TestHarness {
        let store = Arc::new(MemoryStore::with_records(self.media));
        let catalog = Arc::new(MediaCatalog::load(store.clone()).await);

        let mut oracle = ScriptedOracle::all_members();
        if let Some(latency) = self.latency {
            oracle = oracle.with_latency(latency);
        }
        let oracle = Arc::new(oracle);
        for (channel, status) in self.statuses {
            oracle.set_status(&channel, status);
        }

        let workflow = GateWorkflow::new(
            catalog,
            oracle.clone(),
            self.channels.into_iter().map(ChannelId).collect(),
            self.admin,
        );

        TestHarness {
            workflow,
            oracle,
            store,
            transport: MockTransport::new(),
        }
    }
}

/// A wired workflow plus handles to its fakes.
pub struct TestHarness {
    pub workflow: GateWorkflow,
    pub oracle: Arc<ScriptedOracle>,
    pub store: Arc<MemoryStore>,
    pub transport: MockTransport,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// `/get <code>` from `user`.
    pub async fn request(&self, user: u64, code: &str) -> Outcome {
        self.send(
            user,
            GateEvent::CodeRequest {
                code: Some(MediaCode::from(code)),
            },
        )
        .await
    }

    /// The confirmation button pressed by `user`.
    pub async fn confirm(&self, user: u64) -> Outcome {
        self.send(user, GateEvent::Confirmation).await
    }

    /// `/save <code>` from `user` with an optional attachment.
    pub async fn ingest(&self, user: u64, code: &str, media: Option<(MediaKind, &str)>) -> Outcome {
        self.send(
            user,
            GateEvent::Ingest {
                code: Some(MediaCode::from(code)),
                media: media.map(|(kind, handle)| IncomingMedia {
                    kind,
                    handle: MediaHandle::from(handle),
                }),
            },
        )
        .await
    }

    pub async fn send(&self, user: u64, event: GateEvent) -> Outcome {
        self.workflow
            .handle(UserId(user), event, &self.transport)
            .await
    }

    pub fn pending(&self, user: u64) -> Option<String> {
        self.workflow.pending().peek(UserId(user)).map(|c| c.0)
    }
}
