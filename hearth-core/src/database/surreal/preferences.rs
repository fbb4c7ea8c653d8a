use async_trait::async_trait;
use hearth_model::PreferenceProfile;
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use uuid::Uuid;

use crate::database::ports::PreferenceRepository;
use crate::error::Result;

const TABLE: &str = "customer";

/// Read-only view over the `preferences` field of customer documents.
#[derive(Clone, Debug)]
pub struct SurrealPreferenceRepository {
    db: Surreal<Db>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomerDoc {
    #[serde(default)]
    preferences: Option<PreferenceProfile>,
}

impl SurrealPreferenceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Store a profile for a customer. Seed path for development fixtures
    /// and tests.
    pub async fn seed(
        &self,
        customer_id: Uuid,
        profile: PreferenceProfile,
    ) -> Result<()> {
        let _: Option<CustomerDoc> = self
            .db
            .upsert((TABLE, customer_id.to_string()))
            .content(CustomerDoc { preferences: Some(profile) })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceRepository for SurrealPreferenceRepository {
    async fn preferences_for(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<PreferenceProfile>> {
        let doc: Option<CustomerDoc> =
            self.db.select((TABLE, customer_id.to_string())).await?;
        Ok(doc.and_then(|d| d.preferences))
    }
}
