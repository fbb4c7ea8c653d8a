use async_trait::async_trait;
use hearth_model::PreferenceProfile;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::ports::PreferenceRepository;
use crate::error::Result;

/// Read-only view over the `customers.preferences` JSONB column.
#[derive(Clone, Debug)]
pub struct PostgresPreferenceRepository {
    pool: PgPool,
}

impl PostgresPreferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceRepository for PostgresPreferenceRepository {
    async fn preferences_for(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<PreferenceProfile>> {
        let row: Option<(Option<Json<PreferenceProfile>>,)> =
            sqlx::query_as("SELECT preferences FROM customers WHERE user_id = $1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(profile,)| profile).map(|Json(profile)| profile))
    }
}
