//! Chat error types.

use driveloom_postgres::PgError;
use driveloom_search::SearchError;

pub type ChatResult<T> = std::result::Result<T, ChatError>;

/// Errors surfaced by the chat loop. These map onto the error taxonomy of
/// `spec.md` §7: `AccessDenied`/`NotFound` are indistinguishable to the
/// caller by design, `InvalidInput` covers validation failures rejected
/// before any external call, and `Generator`/`Storage` cover transient or
/// permanent upstream failures.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("access denied")]
    AccessDenied,

    #[error("not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generator request failed: {0}")]
    Generator(String),

    #[error("storage error: {0}")]
    Storage(#[from] PgError),

    #[error("retrieval error: {0}")]
    Search(#[from] SearchError),
}

impl ChatError {
    /// A message safe to put on the wire (`spec.md` §7 "a safe-string").
    /// Never includes the underlying upstream error text for anything
    /// that isn't already a deliberately-generic variant.
    pub fn safe_message(&self) -> String {
        match self {
            Self::AccessDenied | Self::NotFound => "access denied".to_owned(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Generator(_) => "the generator is temporarily unavailable".to_owned(),
            Self::Storage(_) => "a storage error occurred".to_owned(),
            Self::Search(_) => "retrieval is temporarily unavailable".to_owned(),
        }
    }
}

impl ChatError {
    /// Narrows a storage lookup failure to `AccessDenied` when it was a
    /// scoped lookup (`SPEC_FULL.md` §4.H "a mismatch returns access
    /// denied, never not found, to avoid identifier enumeration").
    pub fn from_scoped_lookup(err: PgError) -> Self {
        match err {
            PgError::NotFound => Self::AccessDenied,
            other => Self::Storage(other),
        }
    }
}
