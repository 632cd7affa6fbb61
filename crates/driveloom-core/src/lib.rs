#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
pub mod health;
pub mod types;

pub use error::{CoreError, CoreResult};

/// Tracing target shared by every crate in the workspace; each crate also
/// defines its own narrower target constants for log filtering.
pub const TRACING_TARGET: &str = "driveloom";

/// Fixed dimensionality of every dense embedding produced and stored by
/// this workspace (`spec.md` §3 and §4.D).
pub const EMBEDDING_DIMENSIONS: usize = 768;
