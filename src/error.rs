//! Error types for WellnessForge
//!
//! The scoring, forecast, oracle and responder engines are total and never
//! fail. Errors only arise where untyped input crosses into the crate: JSON
//! requests, hour-of-day values from hosts, chat input and configuration.

use thiserror::Error;

/// Errors that can occur at the crate boundaries
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Invalid hour of day: {0} (expected 0-23)")]
    InvalidHour(i64),

    #[error("Chat message is empty")]
    EmptyMessage,

    #[error("Coach reply was cancelled")]
    ReplyCancelled,

    #[error("Coach replies need a running tokio runtime")]
    NoRuntime,

    #[error("Coach reply failed: {0}")]
    ReplyFailed(String),

    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },
}
