// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over the real JSON catalog file.
//!
//! Each test wires a fresh workflow to a `JsonFileStore` in its own temp
//! directory, with the scripted oracle and mock transport standing in for
//! Telegram. Restarts are simulated by loading a new catalog from the same
//! file.

use std::path::Path;
use std::sync::Arc;

use mediagate_core::{
    ChannelId, IncomingMedia, MediaCode, MediaHandle, MediaKind, MembershipStatus, UserId,
};
use mediagate_gate::{GateEvent, GateWorkflow, Outcome};
use mediagate_storage::{JsonFileStore, MediaCatalog};
use mediagate_test_utils::{MockTransport, ScriptedOracle};

const ADMIN: UserId = UserId(7);
const USER: UserId = UserId(1001);

struct Bot {
    workflow: GateWorkflow,
    oracle: Arc<ScriptedOracle>,
    transport: MockTransport,
}

async fn start(path: &Path, channels: &[&str]) -> Bot {
    let store = Arc::new(JsonFileStore::new(path));
    let catalog = Arc::new(MediaCatalog::load(store).await);
    let oracle = Arc::new(ScriptedOracle::all_members());
    let workflow = GateWorkflow::new(
        catalog,
        oracle.clone(),
        channels.iter().map(|c| ChannelId::from(*c)).collect(),
        Some(ADMIN),
    );
    Bot {
        workflow,
        oracle,
        transport: MockTransport::new(),
    }
}

impl Bot {
    async fn send(&self, user: UserId, event: GateEvent) -> Outcome {
        self.workflow.handle(user, event, &self.transport).await
    }

    async fn save(&self, code: &str, kind: MediaKind, handle: &str) -> Outcome {
        self.send(
            ADMIN,
            GateEvent::Ingest {
                code: Some(MediaCode::from(code)),
                media: Some(IncomingMedia {
                    kind,
                    handle: MediaHandle::from(handle),
                }),
            },
        )
        .await
    }

    async fn get(&self, user: UserId, code: &str) -> Outcome {
        self.send(
            user,
            GateEvent::CodeRequest {
                code: Some(MediaCode::from(code)),
            },
        )
        .await
    }
}

#[tokio::test]
async fn saved_media_survives_restart_and_is_delivered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");

    let first = start(&path, &["@news"]).await;
    assert_eq!(
        first.save("12", MediaKind::Video, "VID-1").await,
        Outcome::Ingested {
            code: MediaCode::from("12"),
            kind: MediaKind::Video
        }
    );
    drop(first);

    let second = start(&path, &["@news"]).await;
    assert!(matches!(
        second.get(USER, "12").await,
        Outcome::AwaitingConfirmation(_)
    ));
    assert_eq!(
        second.send(USER, GateEvent::Confirmation).await,
        Outcome::Delivered {
            code: MediaCode::from("12"),
            kind: MediaKind::Video
        }
    );
    assert_eq!(
        second.transport.deliveries().await,
        vec![(USER, MediaKind::Video, MediaHandle::from("VID-1"))]
    );
}

#[tokio::test]
async fn catalog_file_uses_persisted_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");

    let bot = start(&path, &[]).await;
    bot.save("12", MediaKind::Photo, "PH-1").await;
    bot.save("gif", MediaKind::Animation, "AN-1").await;

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "12": {"file_id": "PH-1", "type": "photo"},
            "gif": {"file_id": "AN-1", "type": "animation"},
        })
    );
}

#[tokio::test]
async fn existing_catalog_file_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");
    std::fs::write(&path, r#"{"7": {"file_id": "OLD", "type": "animation"}}"#).unwrap();

    let bot = start(&path, &[]).await;
    bot.get(USER, "7").await;
    bot.send(USER, GateEvent::Confirmation).await;

    assert_eq!(
        bot.transport.deliveries().await,
        vec![(USER, MediaKind::Animation, MediaHandle::from("OLD"))]
    );
}

#[tokio::test]
async fn corrupt_catalog_file_starts_empty_and_is_replaced_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");
    std::fs::write(&path, "{not json").unwrap();

    let bot = start(&path, &[]).await;
    assert!(bot.workflow.catalog().is_empty());
    assert!(matches!(
        bot.get(USER, "1").await,
        Outcome::CodeNotFound(_)
    ));

    bot.save("1", MediaKind::Video, "V").await;
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["1"]["file_id"], "V");
}

#[tokio::test]
async fn non_member_is_held_until_joining() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");

    let bot = start(&path, &["@a", "@b"]).await;
    bot.save("12", MediaKind::Video, "VID").await;
    bot.oracle.set_status("@b", MembershipStatus::NotMember);

    bot.get(USER, "12").await;
    assert_eq!(
        bot.send(USER, GateEvent::Confirmation).await,
        Outcome::Rejected {
            channel: ChannelId::from("@b"),
            status: MembershipStatus::NotMember
        }
    );
    assert!(bot.transport.deliveries().await.is_empty());

    bot.oracle.set_status("@b", MembershipStatus::Member);
    assert!(matches!(
        bot.send(USER, GateEvent::Confirmation).await,
        Outcome::Delivered { .. }
    ));
    assert_eq!(
        bot.send(USER, GateEvent::Confirmation).await,
        Outcome::NoPendingRequest
    );
}

#[tokio::test]
async fn overwrite_is_visible_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("media_db.json");

    let bot = start(&path, &[]).await;
    bot.save("12", MediaKind::Video, "OLD").await;
    bot.save("12", MediaKind::Photo, "NEW").await;
    drop(bot);

    let restarted = start(&path, &[]).await;
    let record = restarted
        .workflow
        .catalog()
        .get(&MediaCode::from("12"))
        .unwrap();
    assert_eq!(record.handle, MediaHandle::from("NEW"));
    assert_eq!(record.kind, MediaKind::Photo);
}
