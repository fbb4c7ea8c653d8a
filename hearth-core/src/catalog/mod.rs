//! The catalog facade and its query building blocks.
//!
//! External callers go through [`CatalogService`]; it normalizes raw filter
//! input, delegates to whichever storage adapter the process was configured
//! with, and layers the similarity/recommendation heuristics on top of the
//! shared listing contract.

pub mod filter;
pub mod pagination;
pub mod recommend;
pub mod similar;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hearth_model::{
    AgentStats, NewProperty, PagedResult, PropertyPatch, PropertyRecord,
    PropertyStatus,
};
use tracing::debug;
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::database::ports::{PreferenceRepository, PropertyRepository};
use crate::database::{self, Stores};
use crate::error::Result;
use filter::PropertyFilter;
use pagination::PageRequest;

/// Single entry point for catalog consumers.
///
/// Owns the storage adapters for the process lifetime; they are injected at
/// construction and never swapped at runtime. Identity verification is the
/// transport middleware's job - the facade only ever checks ownership
/// equality, and it does so inside the adapters.
#[derive(Clone)]
pub struct CatalogService {
    properties: Arc<dyn PropertyRepository>,
    preferences: Arc<dyn PreferenceRepository>,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        preferences: Arc<dyn PreferenceRepository>,
    ) -> Self {
        Self { properties, preferences }
    }

    /// Construct the facade over the backend named in `config`.
    pub async fn from_config(config: &CatalogConfig) -> Result<Self> {
        let (properties, preferences): Stores = database::connect(config).await?;
        Ok(Self::new(properties, preferences))
    }

    /// Public listing query: normalize `raw` into a filter specification
    /// (defaulting public queries to available listings) and fetch one page.
    pub async fn list_properties(
        &self,
        raw: &HashMap<String, String>,
        page: u32,
        per_page: u32,
    ) -> Result<PagedResult> {
        let filter = PropertyFilter::from_raw(raw)?;
        self.properties.list(&filter, PageRequest::new(page, per_page)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<PropertyRecord> {
        self.properties.get(id).await
    }

    pub async fn create(
        &self,
        agent_id: Uuid,
        data: NewProperty,
    ) -> Result<PropertyRecord> {
        self.properties.create(agent_id, data).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        agent_id: Uuid,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord> {
        self.properties.update(id, agent_id, patch).await
    }

    pub async fn delete(&self, id: Uuid, agent_id: Uuid) -> Result<()> {
        self.properties.delete(id, agent_id).await
    }

    /// Free-text search over titles, descriptions, and addresses, scoped by
    /// the same normalized filter input as [`Self::list_properties`].
    pub async fn search(
        &self,
        term: &str,
        raw: &HashMap<String, String>,
        page: u32,
        per_page: u32,
    ) -> Result<PagedResult> {
        let filter = PropertyFilter::from_raw(raw)?;
        self.properties
            .search(term, &filter, PageRequest::new(page, per_page))
            .await
    }

    /// Comparable listings for `id`: same type, +/-20% price band, same
    /// city, available only, never including the reference itself. An empty
    /// result is valid; `NotFound` fires only when the reference is absent.
    pub async fn similar_to(
        &self,
        id: Uuid,
        limit: u32,
    ) -> Result<Vec<PropertyRecord>> {
        let reference = self.properties.get(id).await?;
        let filter = similar::similarity_filter(&reference);
        let page = self.properties.list(&filter, PageRequest::first(limit)).await?;
        debug!(reference = %id, matches = page.properties.len(), "similarity query");
        Ok(page.properties)
    }

    /// Promoted listings: available records flagged `is_featured` in their
    /// features map, newest first, at most `limit`.
    pub async fn featured(&self, limit: u32) -> Result<Vec<PropertyRecord>> {
        let filter = PropertyFilter {
            featured: true,
            status: Some(PropertyStatus::Available),
            ..PropertyFilter::default()
        };
        let page = self.properties.list(&filter, PageRequest::first(limit)).await?;
        Ok(page.properties)
    }

    /// Newest available listings narrowed by the customer's stored
    /// preference profile; without a profile this is simply the newest
    /// available listings.
    pub async fn recommendations_for(
        &self,
        customer_id: Uuid,
        limit: u32,
    ) -> Result<Vec<PropertyRecord>> {
        let profile = self.preferences.preferences_for(customer_id).await?;
        let filter = recommend::preference_filter(profile.as_ref());
        let page = self.properties.list(&filter, PageRequest::first(limit)).await?;
        Ok(page.properties)
    }

    /// Portfolio counts for one agent.
    pub async fn agent_stats(&self, agent_id: Uuid) -> Result<AgentStats> {
        self.properties.agent_stats(agent_id).await
    }
}
