//! Uniform failure signal for every backend call.
//!
//! ERROR HANDLING
//! ==============
//! The API client never recovers a failure itself. It only classifies it so
//! callers can decide: the session probe treats [`ApiError::Unauthenticated`]
//! as "no session", the query cache retries [`ApiError::retryable`] failures,
//! and everything else reaches the initiating view unchanged.
//!
//! `ApiError` is `Clone` because one in-flight read is shared by every caller
//! waiting on the same query key.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Message carried by [`ApiError::Unauthenticated`].
pub const UNAUTHENTICATED_MESSAGE: &str = "Please login first";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered `401 Unauthorized`.
    #[error("Please login first")]
    Unauthenticated,

    /// The backend answered `404 Not Found`.
    #[error("{message}")]
    NotFound { message: String },

    /// Validation or business-rule rejection (4xx other than 401/404).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend failed (5xx).
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// A success response whose body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Caller input rejected before any request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// A logout or teardown happened while the call was settling, so its
    /// result was dropped.
    #[error("session changed before the request completed")]
    Superseded,
}

impl ApiError {
    /// Classify a non-success HTTP status.
    ///
    /// `body` is the raw response text; when it is blank the status text is
    /// used instead, formatted as `Request failed: <status text>`.
    #[must_use]
    pub fn from_status(status: u16, status_text: &str, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("Request failed: {status_text}")
        } else {
            body.to_owned()
        };
        match status {
            401 => Self::Unauthenticated,
            404 => Self::NotFound { message },
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Rejected { .. } => "E_REJECTED",
            Self::Server { .. } => "E_SERVER",
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidInput(_) => "E_INVALID_INPUT",
            Self::Superseded => "E_SUPERSEDED",
        }
    }

    /// Transient failures that a read may retry.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// HTTP status behind the failure, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthenticated => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) | Self::InvalidInput(_) | Self::Superseded => None,
        }
    }
}
