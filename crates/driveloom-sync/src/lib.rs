#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub const TRACING_TARGET: &str = "driveloom_sync";

mod config;
mod error;
mod synchronizer;

pub use config::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_BACKOFF_ATTEMPTS, DEFAULT_STALE_AFTER, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use synchronizer::{SyncOutcome, Synchronizer};
