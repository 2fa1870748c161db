// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory media catalog backed by a durable [`CatalogStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use mediagate_core::{CatalogStore, MediaCode, MediaRecord, MediagateError};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Shared code-to-media mapping.
///
/// Reads are lock-free lookups. Writes are serialized by a writer lock and
/// only become visible after the full catalog has been persisted, so a
/// failed save leaves both memory and disk at the previous state.
pub struct MediaCatalog {
    records: DashMap<MediaCode, MediaRecord>,
    store: Arc<dyn CatalogStore>,
    write_lock: Mutex<()>,
}

impl MediaCatalog {
    /// Loads the persisted catalog.
    ///
    /// An unreadable or corrupt store is not fatal: the catalog starts empty.
    pub async fn load(store: Arc<dyn CatalogStore>) -> Self {
        let records = match store.load_all().await {
            Ok(records) => {
                info!(count = records.len(), "media catalog loaded");
                records
            }
            Err(e) => {
                warn!(error = %e, "media catalog unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            records: records.into_iter().collect(),
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get(&self, code: &MediaCode) -> Option<MediaRecord> {
        self.records.get(code).map(|entry| entry.value().clone())
    }

    /// Stores `record` under `code`, replacing any existing record.
    ///
    /// Returns once the write is durable. On a persistence error nothing is
    /// changed and the error is returned to the caller without retrying.
    pub async fn put(&self, code: MediaCode, record: MediaRecord) -> Result<(), MediagateError> {
        let _writer = self.write_lock.lock().await;

        let mut next = self.snapshot();
        next.insert(code.clone(), record.clone());
        self.store.save_all(&next).await?;

        let replaced = self.records.insert(code.clone(), record).is_some();
        info!(code = %code, replaced, "media stored");
        Ok(())
    }

    /// Sorted copy of every record.
    pub fn snapshot(&self) -> BTreeMap<MediaCode, MediaRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use mediagate_core::{MediaHandle, MediaKind};
    use tracing_test::traced_test;

    use crate::JsonFileStore;

    /// Store whose saves can be made to fail and whose loads always fail on demand.
    #[derive(Default)]
    struct FlakyStore {
        saved: std::sync::Mutex<BTreeMap<MediaCode, MediaRecord>>,
        fail_saves: AtomicBool,
        fail_loads: bool,
    }

    #[async_trait]
    impl CatalogStore for FlakyStore {
        async fn load_all(&self) -> Result<BTreeMap<MediaCode, MediaRecord>, MediagateError> {
            if self.fail_loads {
                return Err(MediagateError::Storage {
                    source: "corrupt".into(),
                });
            }
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save_all(
            &self,
            records: &BTreeMap<MediaCode, MediaRecord>,
        ) -> Result<(), MediagateError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(MediagateError::Storage {
                    source: "disk full".into(),
                });
            }
            *self.saved.lock().unwrap() = records.clone();
            Ok(())
        }
    }

    fn record(handle: &str, kind: MediaKind) -> MediaRecord {
        MediaRecord {
            handle: MediaHandle::from(handle),
            kind,
        }
    }

    #[tokio::test]
    async fn get_missing_code_is_none() {
        let catalog = MediaCatalog::load(Arc::new(FlakyStore::default())).await;
        assert!(catalog.get(&MediaCode::from("nope")).is_none());
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn put_persists_before_returning() {
        let store = Arc::new(FlakyStore::default());
        let catalog = MediaCatalog::load(store.clone()).await;

        catalog
            .put(MediaCode::from("12"), record("H1", MediaKind::Video))
            .await
            .unwrap();

        assert_eq!(
            catalog.get(&MediaCode::from("12")),
            Some(record("H1", MediaKind::Video))
        );
        assert_eq!(
            store.saved.lock().unwrap().get(&MediaCode::from("12")),
            Some(&record("H1", MediaKind::Video))
        );
    }

    #[tokio::test]
    async fn second_put_overwrites_without_merge() {
        let catalog = MediaCatalog::load(Arc::new(FlakyStore::default())).await;
        let code = MediaCode::from("12");

        catalog.put(code.clone(), record("H1", MediaKind::Video)).await.unwrap();
        catalog.put(code.clone(), record("H2", MediaKind::Photo)).await.unwrap();

        assert_eq!(catalog.get(&code), Some(record("H2", MediaKind::Photo)));
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn failed_save_leaves_catalog_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let catalog = MediaCatalog::load(store.clone()).await;
        let code = MediaCode::from("12");
        catalog.put(code.clone(), record("H1", MediaKind::Video)).await.unwrap();

        store.fail_saves.store(true, Ordering::SeqCst);
        let err = catalog
            .put(code.clone(), record("H2", MediaKind::Photo))
            .await
            .unwrap_err();
        assert!(matches!(err, MediagateError::Storage { .. }));

        let fresh = MediaCode::from("13");
        assert!(catalog.put(fresh.clone(), record("H3", MediaKind::Photo)).await.is_err());

        assert_eq!(catalog.get(&code), Some(record("H1", MediaKind::Video)));
        assert!(catalog.get(&fresh).is_none());
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn unreadable_store_starts_empty() {
        let store = FlakyStore {
            fail_loads: true,
            ..FlakyStore::default()
        };
        let catalog = MediaCatalog::load(Arc::new(store)).await;
        assert!(catalog.is_empty());
        assert!(logs_contain("media catalog unreadable"));
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty_and_recovers_on_put() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.json");
        std::fs::write(&path, "]]garbage").unwrap();

        let catalog = MediaCatalog::load(Arc::new(JsonFileStore::new(&path))).await;
        assert!(catalog.is_empty());

        catalog
            .put(MediaCode::from("1"), record("H1", MediaKind::Animation))
            .await
            .unwrap();

        let reloaded = MediaCatalog::load(Arc::new(JsonFileStore::new(&path))).await;
        assert_eq!(
            reloaded.get(&MediaCode::from("1")),
            Some(record("H1", MediaKind::Animation))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_puts_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.json");
        let catalog = Arc::new(MediaCatalog::load(Arc::new(JsonFileStore::new(&path))).await);

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let catalog = catalog.clone();
                tokio::spawn(async move {
                    catalog
                        .put(
                            MediaCode(i.to_string()),
                            record(&format!("H{i}"), MediaKind::Photo),
                        )
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reloaded = MediaCatalog::load(Arc::new(JsonFileStore::new(&path))).await;
        assert_eq!(reloaded.len(), 16);
    }
}
