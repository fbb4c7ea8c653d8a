//! Property catalog access layer.
//!
//! Stores, queries, and ranks property listings over interchangeable
//! backends: a relational store (Postgres), an embedded document store, and
//! a transient in-memory store. All three honor the same contract; callers
//! pick one through [`CatalogConfig`] and never see which is behind the
//! [`CatalogService`] facade.
//!
//! ```no_run
//! use hearth_core::{CatalogConfig, CatalogService};
//!
//! # async fn run() -> hearth_core::Result<()> {
//! let config = CatalogConfig::from_env()?;
//! let catalog = CatalogService::from_config(&config).await?;
//! let stats = catalog.agent_stats(uuid::Uuid::new_v4()).await?;
//! println!("{} listings", stats.total);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;

pub use catalog::filter::PropertyFilter;
pub use catalog::pagination::PageRequest;
pub use catalog::CatalogService;
pub use config::{BackendKind, CatalogConfig};
pub use database::{connect, Stores};
pub use error::{CatalogError, Result};
