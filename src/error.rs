//! Errors surfaced to the presentation layer.
//!
//! Each carries a single human-readable message; underlying causes are
//! logged where they occur and never handed to callers.

use thiserror::Error;

/// Transport, status or decode failure from the NEO feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Provider unset or unreachable.
    #[error("{0}")]
    Configuration(String),

    /// Provider rejected the sign-in or sign-up.
    #[error("{0}")]
    Operation(String),
}
