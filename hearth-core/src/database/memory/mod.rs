//! Transient in-memory storage adapter.
//!
//! One lock-guarded collection owned by the store object; there is no
//! ambient shared state. Mutations serialize through the write half of the
//! `RwLock`, reads proceed concurrently and observe a consistent snapshot
//! for the whole operation (filter, sort, and slice happen under one read
//! guard, so a half-applied update is never visible).
//!
//! Querying is a linear predicate scan followed by an explicit sort and
//! slice - the executable reference for what the SQL and document
//! translations must produce.

use std::collections::HashMap;

use async_trait::async_trait;
use hearth_model::{
    AgentStats, NewProperty, PagedResult, PreferenceProfile, PropertyPatch,
    PropertyRecord, PropertyStatus,
};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::filter::{matches_search_term, PropertyFilter};
use crate::catalog::pagination::{total_pages, PageRequest};
use crate::database::ports::{PreferenceRepository, PropertyRepository};
use crate::error::{CatalogError, Result};

#[derive(Debug, Default)]
pub struct InMemoryPropertyRepository {
    records: RwLock<HashMap<Uuid, PropertyRecord>>,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record verbatim, keeping its id and
    /// timestamps. Seed path for development fixtures and tests.
    pub async fn seed(&self, record: PropertyRecord) {
        self.records.write().await.insert(record.id, record);
    }

    fn paged(mut matches: Vec<PropertyRecord>, page: PageRequest) -> PagedResult {
        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total_count = matches.len() as u64;
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let properties: Vec<PropertyRecord> = matches
            .into_iter()
            .skip(start)
            .take(page.per_page() as usize)
            .collect();

        PagedResult {
            properties,
            current_page: page.page(),
            total_pages: total_pages(total_count, page.per_page()),
            total_count,
            per_page: page.per_page(),
        }
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult> {
        let records = self.records.read().await;
        let matches: Vec<PropertyRecord> =
            records.values().filter(|r| filter.matches(r)).cloned().collect();
        debug!(total = matches.len(), "in-memory listing scan complete");
        Ok(Self::paged(matches, page))
    }

    async fn get(&self, id: Uuid) -> Result<PropertyRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))
    }

    async fn create(
        &self,
        agent_id: Uuid,
        data: NewProperty,
    ) -> Result<PropertyRecord> {
        let record = data.into_record(agent_id);
        self.records.write().await.insert(record.id, record.clone());
        debug!(id = %record.id, "created in-memory property");
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        agent_id: Uuid,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?;
        if record.agent_id != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }
        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid, agent_id: Uuid) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .get(&id)
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?;
        if record.agent_id != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }
        records.remove(&id);
        Ok(())
    }

    async fn search(
        &self,
        term: &str,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult> {
        let records = self.records.read().await;
        let matches: Vec<PropertyRecord> = records
            .values()
            .filter(|r| filter.matches(r) && matches_search_term(r, term))
            .cloned()
            .collect();
        Ok(Self::paged(matches, page))
    }

    async fn agent_stats(&self, agent_id: Uuid) -> Result<AgentStats> {
        let records = self.records.read().await;
        let mine = records.values().filter(|r| r.agent_id == agent_id);

        let mut stats = AgentStats { total: 0, available: 0, sold: 0 };
        for record in mine {
            stats.total += 1;
            match record.status {
                PropertyStatus::Available => stats.available += 1,
                PropertyStatus::Sold => stats.sold += 1,
                _ => {}
            }
        }
        Ok(stats)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceRepository {
    profiles: RwLock<HashMap<Uuid, PreferenceProfile>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer_id: Uuid, profile: PreferenceProfile) {
        self.profiles.write().await.insert(customer_id, profile);
    }
}

#[async_trait]
impl PreferenceRepository for InMemoryPreferenceRepository {
    async fn preferences_for(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<PreferenceProfile>> {
        Ok(self.profiles.read().await.get(&customer_id).cloned())
    }
}
