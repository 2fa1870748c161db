// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media catalog storage for Mediagate.
//!
//! [`MediaCatalog`] is the in-memory code-to-media mapping the gate workflow
//! reads from; every mutation is persisted through a [`CatalogStore`] before
//! it becomes visible. [`JsonFileStore`] is the file-backed store.
//!
//! [`CatalogStore`]: mediagate_core::CatalogStore

pub mod catalog;
pub mod json_store;

pub use catalog::MediaCatalog;
pub use json_store::JsonFileStore;
