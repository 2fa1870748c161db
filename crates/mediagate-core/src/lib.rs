// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Mediagate.
//!
//! This crate provides the domain types, the error type, and the narrow
//! collaborator traits (catalog persistence, membership oracle, message
//! transport) that the gate workflow is written against. Platform adapters
//! and storage backends implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MediagateError;
pub use types::{
    Button, ButtonAction, ChannelId, IncomingMedia, MediaCode, MediaHandle, MediaKind,
    MediaRecord, MembershipStatus, UserId,
};

pub use traits::{CatalogStore, MembershipOracle, Transport};
