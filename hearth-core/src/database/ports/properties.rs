use async_trait::async_trait;
use hearth_model::{
    AgentStats, NewProperty, PagedResult, PropertyPatch, PropertyRecord,
};
use uuid::Uuid;

use crate::catalog::filter::PropertyFilter;
use crate::catalog::pagination::PageRequest;
use crate::error::Result;

// Listing storage and querying. The contract is identical across adapters:
// every implementation must return byte-identical `PagedResult` shapes for
// equivalent data and filters, whatever its native query capabilities.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Apply every present predicate AND-combined, ordered by creation time
    /// descending with ties broken by id ascending.
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult>;

    /// Fails with `NotFound` when the record is absent.
    async fn get(&self, id: Uuid) -> Result<PropertyRecord>;

    /// Assigns identity, timestamps, and defaulted status before storing.
    async fn create(
        &self,
        agent_id: Uuid,
        data: NewProperty,
    ) -> Result<PropertyRecord>;

    /// `NotFound` when the record is absent, `Unauthorized` when `agent_id`
    /// does not own it. The two kinds are never conflated.
    async fn update(
        &self,
        id: Uuid,
        agent_id: Uuid,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord>;

    /// Same `NotFound`/`Unauthorized` distinction as `update`.
    async fn delete(&self, id: Uuid, agent_id: Uuid) -> Result<()>;

    /// Free-text search: `term` is OR-matched over title, description, and
    /// address parts, AND-combined with `filter`.
    async fn search(
        &self,
        term: &str,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult>;

    /// Portfolio counts for one agent.
    async fn agent_stats(&self, agent_id: Uuid) -> Result<AgentStats>;
}
