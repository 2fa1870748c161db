// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel-membership gate for Mediagate.
//!
//! A user asks for a media code, is prompted to join every required channel,
//! and confirms. The [`GateWorkflow`] re-checks membership in order at the
//! moment of confirmation and only then delivers the media, consuming the
//! user's [`PendingRequests`] entry.

pub mod messages;
pub mod pending;
pub mod workflow;

pub use pending::PendingRequests;
pub use workflow::{CONFIRM_TRIGGER, GateEvent, GateWorkflow, Outcome};
