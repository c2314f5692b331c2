//! # AppError
//!
//! Centralized error taxonomy for the Rusty-Feed engine. Collaborator
//! failures are caught at the service boundary and mapped here; raw
//! transport errors never reach the caller.

use thiserror::Error;

/// Moderation rejection kinds. These are business outcomes, not transport
/// failures, and render with distinct messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Legacy body-sentinel signal ("yes\n" on a 2xx response).
    Flagged,
    /// HTTP 403 from the Posts API.
    Forbidden,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Flagged => write!(f, "content was flagged by moderation"),
            Rejection::Forbidden => write!(f, "content violates policy"),
        }
    }
}

/// The primary error type for all rusty-feed operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Empty or malformed user input (e.g. blank submission)
    #[error("validation error: {0}")]
    Validation(String),

    /// Object Store failure while exchanging an image for a URL
    #[error("upload failed: {0}")]
    Upload(String),

    /// Content rejected by the moderation layer
    #[error("moderation rejection: {0}")]
    Moderation(Rejection),

    /// Network/HTTP failure other than moderation signals
    #[error("transport error: {0}")]
    Transport(String),

    /// Response did not match the expected structure or content type
    #[error("parse error: {0}")]
    Parse(String),

    /// Identity Provider failure (duplicate email, bad credentials)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The age gate could not resolve a birth date. Fails closed.
    #[error("age verification could not be completed")]
    AgeGateUndetermined,

    /// The age gate resolved a birth date below the minimum age.
    #[error("age requirement not met: {0}")]
    AgeGateIneligible(String),
}

impl AppError {
    /// Recovers a typed error from a collaborator's `anyhow` chain.
    ///
    /// Adapters embed an `AppError` when they can classify a failure
    /// themselves (e.g. the JSON content-type guard); anything else
    /// degrades to `Transport`.
    pub fn from_collaborator(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app) => app,
            Err(other) => AppError::Transport(other.to_string()),
        }
    }
}

/// A specialized Result type for rusty-feed logic.
pub type Result<T> = std::result::Result<T, AppError>;
