//! Relational storage adapter backed by Postgres via sqlx.
//!
//! Concurrency control is delegated entirely to the database (read-committed
//! semantics); this layer performs no locking of its own beyond the
//! row-level `FOR UPDATE` used to keep the NotFound/Unauthorized distinction
//! honest under concurrent mutation.

pub mod preferences;
pub mod properties;

pub use preferences::PostgresPreferenceRepository;
pub use properties::PostgresPropertyRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Open a pool against `url` and bring the schema up to date.
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!(max_connections, "connected to Postgres catalog store");

    Ok(pool)
}
