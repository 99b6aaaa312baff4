use std::fmt;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body returned to callers whose request was rejected by the limiter.
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Try again later.";

/// Error type for window counter configuration.
///
/// This is a simple enum with no data, so it derives `Copy` for efficient
/// pass-by-value semantics without cloning overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// The per-window request limit cannot be zero.
    ZeroLimit,
    /// The window duration cannot be zero.
    ZeroWindow,
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitError::ZeroLimit => {
                write!(f, "max requests per window must be greater than 0")
            }
            RateLimitError::ZeroWindow => {
                write!(f, "window duration must be greater than 0")
            }
        }
    }
}

impl std::error::Error for RateLimitError {}

/// A request was refused because the active window is saturated.
///
/// Converting it into a response yields `429 Too Many Requests` with a fixed
/// plain-text body and the standard rate limit headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit of {limit} requests per window exceeded")]
pub struct RateLimitExceeded {
    /// Configured requests per window.
    pub limit: u32,
    /// Time left until the counter is reset.
    pub retry_after: Duration,
}

impl RateLimitExceeded {
    /// Whole seconds until retrying makes sense, never less than one.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

impl IntoResponse for RateLimitExceeded {
    fn into_response(self) -> Response {
        (
            StatusCode::TOO_MANY_REQUESTS,
            [
                ("Retry-After", self.retry_after_secs().to_string()),
                ("X-RateLimit-Limit", self.limit.to_string()),
                ("X-RateLimit-Remaining", "0".to_string()),
            ],
            RATE_LIMIT_MESSAGE,
        )
            .into_response()
    }
}

/// Application-wide startup errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid rate limit settings: {0}")]
    RateLimit(#[from] RateLimitError),
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
