use async_trait::async_trait;
use hearth_model::PreferenceProfile;
use uuid::Uuid;

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

// Read-only view of the customer-profile collaborator. The catalog never
// writes preferences; it only narrows recommendation queries with them.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// `None` when the customer has no stored profile; that is not an error.
    async fn preferences_for(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<PreferenceProfile>>;
}
