// SPDX-FileCopyrightText: 2026 Mediagate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Mediagate.

use thiserror::Error;

/// The primary error type used across collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum MediagateError {
    /// Configuration errors (missing bot token, malformed values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Catalog persistence errors (unreadable file, failed write, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (send failure, invalid chat, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
