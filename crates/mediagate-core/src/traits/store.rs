// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence backend for the media catalog.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::MediagateError;
use crate::types::{MediaCode, MediaRecord};

/// Durable whole-catalog storage.
///
/// The catalog is small and written rarely, so backends persist and load the
/// complete mapping at once rather than individual records.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Reads the persisted mapping. An absent store yields an empty map.
    async fn load_all(&self) -> Result<BTreeMap<MediaCode, MediaRecord>, MediagateError>;

    /// Replaces the persisted mapping. Returns only once the write is durable.
    async fn save_all(
        &self,
        records: &BTreeMap<MediaCode, MediaRecord>,
    ) -> Result<(), MediagateError>;
}
