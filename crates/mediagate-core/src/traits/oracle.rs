// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Membership oracle trait.

use async_trait::async_trait;

use crate::types::{ChannelId, MembershipStatus, UserId};

/// Answers whether a user currently belongs to a channel.
///
/// Implementations never fail: transport errors, misconfigured channels and
/// missing bot permissions map to [`MembershipStatus::Unknown`] with a reason
/// the user can act on. Results must not be cached.
#[async_trait]
pub trait MembershipOracle: Send + Sync + 'static {
    async fn check(&self, channel: &ChannelId, user: UserId) -> MembershipStatus;
}
