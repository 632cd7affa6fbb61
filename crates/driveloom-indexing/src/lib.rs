#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub const TRACING_TARGET: &str = "driveloom_indexing";

mod config;
mod error;
mod job;
mod pool;
mod state;

pub use config::{DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_POLL_INTERVAL, WorkerConfig};
pub use error::{IndexingError, IndexingResult};
pub use job::process;
pub use pool::IndexingWorker;
pub use state::WorkerState;
