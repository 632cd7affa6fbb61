mod pg_client;
mod pg_config;

pub use pg_client::{PgClient, PgConn, PgPoolStatus};
pub use pg_config::PgConfig;

pub(crate) type ConnectionPool =
    deadpool::managed::Pool<diesel_async::pooled_connection::AsyncDieselConnectionManager<crate::PgConnection>>;
pub(crate) type PooledConnection = deadpool::managed::Object<
    diesel_async::pooled_connection::AsyncDieselConnectionManager<crate::PgConnection>,
>;
