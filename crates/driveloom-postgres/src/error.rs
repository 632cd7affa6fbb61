//! Error types for database operations.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, Error};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when talking to Postgres.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database operation timed out")]
    Timeout(TimeoutType),

    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database migration error: {0}")]
    Migration(BoxError),

    #[error("database query error: {0}")]
    Query(#[from] Error),

    #[error("record not found")]
    NotFound,

    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Whether this error indicates a transient failure that might succeed on retry
    /// (`SPEC_FULL.md` §8 error classification).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }

    pub fn is_permanent(&self) -> bool {
        !self.is_transient() && !matches!(self, PgError::NotFound)
    }
}

impl From<DeadpoolError> for PgError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!(target: crate::TRACING_TARGET_CONNECTION, error = %err, "post-create hook failed");
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                Self::Unexpected("no tokio runtime specified for connection pool".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "connection pool is closed".into(),
            )),
        }
    }
}

/// Specialized [`Result`] for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;
