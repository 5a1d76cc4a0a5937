//! Completion client error types
//!
//! The retry classification lives here, not in the provider clients:
//! both providers turn a failed HTTP exchange into a `CompletionError`
//! and then ask it whether and when to retry.

use std::time::Duration;
use thiserror::Error;

/// Base delay for exponential backoff between retry attempts
const BACKOFF_BASE_MS: u64 = 1000;

/// Errors that can occur during completion calls
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompletionError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, CompletionError::RateLimited { .. })
    }

    /// Check if this error is retryable
    ///
    /// Rate limits, request timeouts (408), server errors (5xx, which
    /// covers Anthropic's 529 overloaded), network failures, and client
    /// timeouts are transient. Everything else is a caller or protocol
    /// problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            CompletionError::RateLimited { .. } => true,
            CompletionError::ApiError { status, .. } => *status == 408 || *status >= 500,
            CompletionError::Network(_) => true,
            CompletionError::Timeout(_) => true,
            CompletionError::InvalidResponse(_) => false,
            CompletionError::Json(_) => false,
        }
    }

    /// Get the retry duration if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            CompletionError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Delay to sleep before retry `attempt` (1-based)
    ///
    /// A rate limit honors the server-provided timing; everything else
    /// backs off exponentially from the base delay.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_after()
            .unwrap_or_else(|| Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt.saturating_sub(1))))
    }
}
