//! Connection pool and migration runner.

use std::fmt;
use std::sync::Arc;

use deadpool::managed::Pool;
use derive_more::{Deref, DerefMut};
use diesel::Connection;
use diesel_async::AsyncConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_migrations::MigrationHarness;

use super::pg_config::PgConfig;
use super::{ConnectionPool, PooledConnection};
use crate::{MIGRATIONS, PgConnection, PgError, PgResult, TRACING_TARGET_CONNECTION};

/// Point-in-time view of a pool's utilization.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

impl PgPoolStatus {
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            (self.size - self.available) as f64 / self.max_size as f64
        }
    }

    pub fn is_under_pressure(&self) -> bool {
        self.waiting > 0 || self.utilization() > 0.8
    }
}

/// High-level database client: owns the connection pool and config, and
/// applies migrations on startup.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION, fields(database_url = %config.database_url_masked()))]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "initializing database client");

        let manager = AsyncDieselConnectionManager::<PgConnection>::new(&config.postgres_url);
        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .build()
            .map_err(|e| PgError::Unexpected(format!("failed to build connection pool: {e}").into()))?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Runs all embedded migrations, blocking the current thread for the
    /// duration of the migration run (diesel_migrations is synchronous).
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn run_pending_migrations(&self) -> PgResult<()> {
        let url = self.inner.config.postgres_url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = diesel::pg::PgConnection::establish(&url)
                .map_err(PgError::Connection)?;
            conn.run_pending_migrations(MIGRATIONS)
                .map_err(PgError::Migration)?;
            Ok::<_, PgError>(())
        })
        .await
        .map_err(|e| PgError::Unexpected(e.to_string().into()))??;

        tracing::info!(target: TRACING_TARGET_CONNECTION, "migrations applied");
        Ok(())
    }

    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let conn = self.inner.pool.get().await.map_err(PgError::from)?;
        Ok(PgConn::new(conn))
    }

    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}

/// A leased connection from the pool. Implements every repository trait via
/// [`Deref`]/[`DerefMut`] to the underlying [`PgConnection`]; returned to the
/// pool automatically on drop.
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    pub(crate) fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }

    /// Runs `f` inside a single database transaction, committing on `Ok`
    /// and rolling back on `Err` (`SPEC_FULL.md` §4.A "single-transaction
    /// batch replace").
    pub async fn transaction<'a, T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r mut PooledConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
            + Send
            + 'a,
        T: Send + 'a,
        E: From<diesel::result::Error> + Send + 'a,
    {
        self.conn.transaction(f).await
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
