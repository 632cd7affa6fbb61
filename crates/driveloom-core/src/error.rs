//! Shared error taxonomy for the retrieval/indexing/chat engine.
//!
//! Every crate defines its own narrow error type for the failures it can
//! produce internally (`PgError`, `EmbeddingError`, ...) and converts into
//! [`CoreError`] at the boundary of an operation listed in `spec.md` §6's
//! inbound surface table: a per-crate error type plus a coarser
//! classification exposed to callers.

use std::borrow::Cow;

/// Specialized [`Result`] alias for operations that return [`CoreError`].
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Error taxonomy from `spec.md` §7.
///
/// Authorization and not-found failures are deliberately given the same
/// shape (`AccessDenied`) so that callers cannot distinguish "the file
/// doesn't belong to you" from "the file doesn't exist" by error type
/// alone — `spec.md` §8 requires identical latency and shape for both.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors should be handled or propagated"]
pub enum CoreError {
    /// Cross-tenant/cross-folder access, or a resource that doesn't exist.
    /// Never distinguished from not-found to avoid identifier enumeration.
    #[error("access denied")]
    AccessDenied,

    /// Malformed input rejected before any external call was made.
    #[error("validation failed: {0}")]
    Validation(Cow<'static, str>),

    /// A unique-key conflict (duplicate folder registration, duplicate job).
    #[error("conflict: {0}")]
    Conflict(Cow<'static, str>),

    /// A transient failure from an upstream service or the database that
    /// may succeed if retried (rate limit, timeout, 5xx, connection drop).
    #[error("transient upstream failure: {0}")]
    Transient(Cow<'static, str>),

    /// A permanent failure from an upstream service that will not succeed
    /// on retry (unsupported MIME, revoked credentials, 404).
    #[error("permanent upstream failure: {0}")]
    Permanent(Cow<'static, str>),

    /// An error that doesn't fit the taxonomy above, with an opaque source.
    #[error("internal error: {message}")]
    Internal {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CoreError {
    /// Creates a validation error from a static or owned message.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error from a static or owned message.
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a transient error from a static or owned message.
    pub fn transient(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Transient(message.into())
    }

    /// Creates a permanent error from a static or owned message.
    pub fn permanent(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Permanent(message.into())
    }

    /// Creates an internal error with an attached source.
    pub fn internal_with_source(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns whether this failure is worth retrying.
    ///
    /// Used by the indexing worker's retry policy (`spec.md` §4.F) and by
    /// the embedding client's internal backoff loop.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// A safe, user-facing rendering of an error, suitable for the terminal
/// `{error, message}` stream event in `spec.md` §6 and §7. Never includes
/// source chain details that might leak internal state.
pub fn safe_message(err: &CoreError) -> String {
    match err {
        CoreError::AccessDenied => "access denied".to_owned(),
        CoreError::Validation(msg) => format!("invalid request: {msg}"),
        CoreError::Conflict(msg) => format!("conflict: {msg}"),
        CoreError::Transient(_) => "the service is temporarily unavailable, please retry".to_owned(),
        CoreError::Permanent(msg) => format!("request could not be completed: {msg}"),
        CoreError::Internal { .. } => "an internal error occurred".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_is_retryable() {
        assert!(CoreError::transient("rate limited").is_transient());
        assert!(!CoreError::permanent("unsupported mime").is_transient());
        assert!(!CoreError::AccessDenied.is_transient());
    }

    #[test]
    fn safe_message_never_leaks_source() {
        let err = CoreError::internal_with_source(
            "db pool exhausted with connection string postgres://secret",
            std::io::Error::other("boom"),
        );
        assert_eq!(safe_message(&err), "an internal error occurred");
    }
}
