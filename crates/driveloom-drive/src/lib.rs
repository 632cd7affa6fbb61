#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
mod gdrive;
mod provider;

pub use error::{DriveError, DriveResult};
pub use gdrive::{GoogleDriveConfig, GoogleDriveProvider};
pub use provider::{DriveEntry, DriveProvider, ListPage};

/// Tracing target for drive provider operations.
pub const TRACING_TARGET: &str = "driveloom_drive";
