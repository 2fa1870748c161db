// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the gate workflow depends on.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility, so
//! the workflow can hold them as `Arc<dyn ...>` and tests can substitute fakes.

pub mod oracle;
pub mod store;
pub mod transport;

pub use oracle::MembershipOracle;
pub use store::CatalogStore;
pub use transport::Transport;
