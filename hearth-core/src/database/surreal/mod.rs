//! Document storage adapter backed by embedded SurrealDB.
//!
//! The document engine stores listings as schemaless documents, so the
//! adapter normalizes every value it writes (string ids, float price, a
//! numeric recency key) and converts back to the canonical record shape on
//! every read. Consistency is the engine's: this layer performs no locking.

pub mod preferences;
pub mod properties;

pub use preferences::SurrealPreferenceRepository;
pub use properties::SurrealPropertyRepository;

use surrealdb::engine::local::{Db, Mem};
use surrealdb::Surreal;
use tracing::info;

use crate::error::Result;

/// Open the embedded document store and select the configured
/// namespace/database pair.
pub async fn connect(namespace: &str, database: &str) -> Result<Surreal<Db>> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns(namespace).use_db(database).await?;
    info!(namespace, database, "opened embedded document store");
    Ok(db)
}
