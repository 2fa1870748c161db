// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mediagate integration tests.
//!
//! Provides fakes for every collaborator of the gate workflow so tests run
//! without the Telegram Bot API or the filesystem.
//!
//! # Components
//!
//! - [`MockTransport`] - Records every outbound message; delivery can be made to fail
//! - [`ScriptedOracle`] - Membership answers per channel, with a query log
//! - [`MemoryStore`] - In-memory catalog store with injectable save failures
//! - [`TestHarness`] - A fully wired workflow built from the fakes above

pub mod harness;
pub mod memory_store;
pub mod mock_transport;
pub mod scripted_oracle;

pub use harness::TestHarness;
pub use memory_store::MemoryStore;
pub use mock_transport::{MockTransport, Sent};
pub use scripted_oracle::ScriptedOracle;
