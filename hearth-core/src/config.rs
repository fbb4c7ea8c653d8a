//! Startup configuration for the catalog.
//!
//! One backend is selected here, once, when the process boots. Business code
//! never inspects the environment itself; it receives the already-constructed
//! store from [`crate::database::connect`].

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

/// Which storage technology backs the catalog for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Relational store via Postgres.
    Postgres,
    /// Embedded document store via SurrealDB.
    Surreal,
    /// Transient in-memory store for development and tests.
    Memory,
}

/// Settings consumed at process start. Immutable afterwards; the catalog
/// offers no runtime backend switching.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub backend: BackendKind,
    /// Connection string for the Postgres backend. Ignored by the others.
    #[serde(default)]
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Namespace / database names for the document backend.
    pub namespace: String,
    pub database: String,
}

impl CatalogConfig {
    /// Load settings from `HEARTH_*` environment variables layered over
    /// defaults (`HEARTH_BACKEND`, `HEARTH_DATABASE_URL`, ...).
    pub fn from_env() -> Result<Self> {
        let config = Config::builder()
            .set_default("backend", "memory")?
            .set_default("max_connections", 5)?
            .set_default("namespace", "hearth")?
            .set_default("database", "catalog")?
            .add_source(Environment::with_prefix("HEARTH"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Settings for a transient in-memory deployment.
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            database_url: None,
            max_connections: 5,
            namespace: "hearth".to_string(),
            database: "catalog".to_string(),
        }
    }
}
