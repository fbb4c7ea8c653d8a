//! Storage adapters and their selection.
//!
//! Exactly one adapter pair is constructed per process, from configuration,
//! and handed to the facade. Business logic never inspects the environment
//! or reaches for an ambient store.

pub mod memory;
pub mod ports;
pub mod postgres;
pub mod surreal;

use std::sync::Arc;

use tracing::info;

use crate::config::{BackendKind, CatalogConfig};
use crate::error::{CatalogError, Result};
use ports::{PreferenceRepository, PropertyRepository};

/// The adapter pair backing one catalog process.
pub type Stores = (Arc<dyn PropertyRepository>, Arc<dyn PreferenceRepository>);

/// Construct the configured backend. Called once at process start; the
/// returned stores are immutable for the process lifetime.
pub async fn connect(config: &CatalogConfig) -> Result<Stores> {
    match config.backend {
        BackendKind::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                CatalogError::Config(config::ConfigError::Message(
                    "postgres backend requires database_url".to_string(),
                ))
            })?;
            let pool = postgres::connect_pool(url, config.max_connections).await?;
            info!("catalog backed by Postgres");
            Ok((
                Arc::new(postgres::PostgresPropertyRepository::new(pool.clone())),
                Arc::new(postgres::PostgresPreferenceRepository::new(pool)),
            ))
        }
        BackendKind::Surreal => {
            let db = surreal::connect(&config.namespace, &config.database).await?;
            info!("catalog backed by embedded document store");
            Ok((
                Arc::new(surreal::SurrealPropertyRepository::new(db.clone())),
                Arc::new(surreal::SurrealPreferenceRepository::new(db)),
            ))
        }
        BackendKind::Memory => {
            info!("catalog backed by transient in-memory store");
            Ok((
                Arc::new(memory::InMemoryPropertyRepository::new()),
                Arc::new(memory::InMemoryPreferenceRepository::new()),
            ))
        }
    }
}
