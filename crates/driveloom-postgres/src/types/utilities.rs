//! Shared row-trait helpers used for cross-cutting queries (staleness checks,
//! audit projections) without depending on a specific model's field layout.

/// A row that records when it was first created.
pub trait HasCreatedAt {
    fn created_at(&self) -> jiff::Timestamp;
}

/// A row that records when it was last updated.
pub trait HasUpdatedAt {
    fn updated_at(&self) -> jiff::Timestamp;
}
