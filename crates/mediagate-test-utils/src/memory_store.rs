// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory catalog store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mediagate_core::{CatalogStore, MediaCode, MediaRecord, MediagateError};

/// A [`CatalogStore`] holding the "persisted" catalog in memory.
///
/// Saves fail while [`set_fail_saves`](Self::set_fail_saves) is on, simulating
/// a full disk; the stored contents are left untouched in that case.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<MediaCode, MediaRecord>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// A store pre-populated with `records`, as if loaded from disk.
    pub fn with_records(records: impl IntoIterator<Item = (MediaCode, MediaRecord)>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// What a fresh load would return.
    pub fn records(&self) -> BTreeMap<MediaCode, MediaRecord> {
        self.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<MediaCode, MediaRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load_all(&self) -> Result<BTreeMap<MediaCode, MediaRecord>, MediagateError> {
        Ok(self.records())
    }

    async fn save_all(
        &self,
        records: &BTreeMap<MediaCode, MediaRecord>,
    ) -> Result<(), MediagateError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(MediagateError::Storage {
                source: Box::new(std::io::Error::other("no space left on device")),
            });
        }
        *self.lock() = records.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
