// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file catalog store.
//!
//! The whole catalog lives in one pretty-printed JSON object keyed by code:
//! `{ "12": { "file_id": "...", "type": "video" } }`. Writes go to a temp
//! file in the same directory which is then renamed over the target, so a
//! crash mid-write never leaves a truncated catalog behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mediagate_core::{CatalogStore, MediaCode, MediaRecord, MediagateError};
use tracing::debug;

type Records = BTreeMap<MediaCode, MediaRecord>;

/// File-backed [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load_all(&self) -> Result<Records, MediagateError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_catalog(&path))
            .await
            .map_err(|e| MediagateError::Internal(format!("catalog load task failed: {e}")))?
    }

    async fn save_all(&self, records: &Records) -> Result<(), MediagateError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| MediagateError::Storage { source: e.into() })?;
        let path = self.path.clone();
        let count = records.len();

        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .map_err(|e| MediagateError::Internal(format!("catalog save task failed: {e}")))??;

        debug!(path = %self.path.display(), count, "catalog persisted");
        Ok(())
    }
}

fn read_catalog(path: &Path) -> Result<Records, MediagateError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Records::new()),
        Err(e) => return Err(MediagateError::Storage { source: e.into() }),
    };
    serde_json::from_slice(&bytes).map_err(|e| MediagateError::Storage { source: e.into() })
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), MediagateError> {
    let storage_err = |e: std::io::Error| MediagateError::Storage { source: e.into() };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(storage_err)?;
    tmp.write_all(bytes).map_err(storage_err)?;
    tmp.as_file().sync_all().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}
