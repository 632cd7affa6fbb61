//! Embedding error taxonomy (`spec.md` §4.D "failure taxonomy").

use std::time::Duration;

pub type EmbeddingResult<T> = std::result::Result<T, EmbeddingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    InvalidInput,
    RateLimited,
    Network,
    Timeout,
    ServiceUnavailable,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication failed"),
            Self::InvalidInput => write!(f, "invalid input"),
            Self::RateLimited => write!(f, "rate limit exceeded"),
            Self::Network => write!(f, "network error"),
            Self::Timeout => write!(f, "operation timed out"),
            Self::ServiceUnavailable => write!(f, "service unavailable"),
            Self::Internal => write!(f, "internal service error"),
        }
    }
}

/// An embedding-service error, classified into permanent vs. transient
/// (`spec.md` §4.D "transient service errors ... retry with capped
/// exponential backoff ...; permanent errors propagate").
#[derive(Debug, thiserror::Error)]
#[error("{kind}{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct EmbeddingError {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

impl EmbeddingError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::RateLimited | ErrorKind::Network | ErrorKind::Timeout | ErrorKind::ServiceUnavailable)
    }

    pub fn retry_delay(&self, attempt: u32, base: Duration, factor: u32) -> Duration {
        base * factor.saturating_pow(attempt)
    }
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Network
        } else if err.status().map(|s| s.as_u16() == 429).unwrap_or(false) {
            ErrorKind::RateLimited
        } else if err.status().map(|s| s.is_server_error()).unwrap_or(false) {
            ErrorKind::ServiceUnavailable
        } else {
            ErrorKind::Internal
        };
        Self::new(kind).with_message(err.to_string())
    }
}
