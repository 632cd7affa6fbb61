#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Tracing target for connection pool and migration lifecycle events.
pub const TRACING_TARGET_CONNECTION: &str = "driveloom_postgres::connection";
/// Tracing target for repository query execution.
pub const TRACING_TARGET_QUERY: &str = "driveloom_postgres::queries";

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use client::{PgClient, PgConfig, PgConn, PgPoolStatus};
pub use error::{BoxError, PgError, PgResult};
