use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_model::{
    AgentStats, Features, Location, NewProperty, PagedResult, PropertyPatch,
    PropertyRecord, PropertyStatus, PropertyType,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::filter::PropertyFilter;
use crate::catalog::pagination::{total_pages, PageRequest};
use crate::database::ports::PropertyRepository;
use crate::error::{CatalogError, Result};

const TABLE: &str = "property";

#[derive(Clone, Debug)]
pub struct SurrealPropertyRepository {
    db: Surreal<Db>,
}

/// Document shape stored in the engine.
///
/// Everything the adapter compares against is kept in engine-friendly form:
/// ids as strings, price as the engine's float numeric, and `created_ts` as
/// a microsecond recency key so ordering never depends on how the engine
/// collates timestamp strings. The price mapping through `f64` is a known
/// precision boundary of this backend and is converted back to `Decimal` at
/// the edge.
#[derive(Debug, Serialize, Deserialize)]
struct PropertyDoc {
    property_id: String,
    agent_id: String,
    title: String,
    description: String,
    property_type: String,
    price: f64,
    location: Location,
    features: Features,
    images: Vec<String>,
    status: String,
    created_ts: i64,
    created_at: String,
    updated_at: String,
}

impl PropertyDoc {
    fn from_record(record: &PropertyRecord) -> Result<Self> {
        let price = record.price.to_f64().ok_or_else(|| {
            CatalogError::Backend(format!(
                "price {} not representable in the document store",
                record.price
            ))
        })?;

        Ok(Self {
            property_id: record.id.to_string(),
            agent_id: record.agent_id.to_string(),
            title: record.title.clone(),
            description: record.description.clone(),
            property_type: record.property_type.as_str().to_string(),
            price,
            location: record.location.clone(),
            features: record.features.clone(),
            images: record.images.clone(),
            status: record.status.as_str().to_string(),
            created_ts: record.created_at.timestamp_micros(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        })
    }

    fn into_record(self) -> Result<PropertyRecord> {
        let parse_err = |field: &str, value: &str| {
            CatalogError::Backend(format!(
                "stored document has invalid {field}: {value:?}"
            ))
        };

        let id: Uuid = self
            .property_id
            .parse()
            .map_err(|_| parse_err("property_id", &self.property_id))?;
        let agent_id: Uuid = self
            .agent_id
            .parse()
            .map_err(|_| parse_err("agent_id", &self.agent_id))?;
        let property_type = PropertyType::parse(&self.property_type)
            .ok_or_else(|| parse_err("property_type", &self.property_type))?;
        let status = PropertyStatus::parse(&self.status)
            .ok_or_else(|| parse_err("status", &self.status))?;
        let price = Decimal::from_f64(self.price)
            .ok_or_else(|| parse_err("price", &self.price.to_string()))?;
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| parse_err("created_at", &self.created_at))?;
        let updated_at = parse_timestamp(&self.updated_at)
            .ok_or_else(|| parse_err("updated_at", &self.updated_at))?;

        Ok(PropertyRecord {
            id,
            agent_id,
            title: self.title,
            description: self.description,
            property_type,
            price,
            location: self.location,
            features: self.features,
            images: self.images,
            status,
            created_at,
            updated_at,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// Translate the filter (and optional search term) into document query
/// clauses plus their bound parameters.
///
/// Known capability note: the OR-combined free-text block cannot use the
/// engine's per-field indexes and degrades to a table scan; single-field
/// predicates remain indexable. The limitation is inherent to multi-field
/// OR matching in the document engine, not to this translation.
fn build_clauses(
    filter: &PropertyFilter,
    term: Option<&str>,
) -> (String, Vec<(&'static str, serde_json::Value)>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<(&'static str, serde_json::Value)> = Vec::new();

    if !filter.types.is_empty() {
        let types: Vec<&str> =
            filter.types.iter().map(PropertyType::as_str).collect();
        clauses.push("property_type IN $types".to_string());
        binds.push(("types", json!(types)));
    }
    if let Some(min) = filter.price_min {
        clauses.push("price >= $price_min".to_string());
        binds.push(("price_min", json!(min.to_f64())));
    }
    if let Some(max) = filter.price_max {
        clauses.push("price <= $price_max".to_string());
        binds.push(("price_max", json!(max.to_f64())));
    }
    if let Some(min) = filter.bedrooms_min {
        clauses.push("(features.bedrooms ?? -1) >= $bedrooms_min".to_string());
        binds.push(("bedrooms_min", json!(min)));
    }
    if let Some(min) = filter.bathrooms_min {
        clauses
            .push("(features.bathrooms ?? -1) >= $bathrooms_min".to_string());
        binds.push(("bathrooms_min", json!(min)));
    }
    if let Some(city) = &filter.city {
        clauses.push(
            "string::contains(string::lowercase(location.city), $city)"
                .to_string(),
        );
        binds.push(("city", json!(city.to_lowercase())));
    }
    if let Some(state) = &filter.state {
        clauses.push(
            "string::contains(string::lowercase(location.state), $state)"
                .to_string(),
        );
        binds.push(("state", json!(state.to_lowercase())));
    }
    if let Some(city) = &filter.city_exact {
        clauses.push("location.city = $city_exact".to_string());
        binds.push(("city_exact", json!(city)));
    }
    if let Some(agent_id) = filter.agent_id {
        clauses.push("agent_id = $agent_id".to_string());
        binds.push(("agent_id", json!(agent_id.to_string())));
    }
    if let Some(status) = filter.status {
        clauses.push("status = $status".to_string());
        binds.push(("status", json!(status.as_str())));
    }
    if filter.featured {
        clauses.push("(features.is_featured ?? false) = true".to_string());
    }
    if let Some(excluded) = filter.exclude_id {
        clauses.push("property_id != $exclude_id".to_string());
        binds.push(("exclude_id", json!(excluded.to_string())));
    }

    if let Some(term) = term {
        clauses.push(
            "(string::contains(string::lowercase(title), $term) \
             OR string::contains(string::lowercase(description), $term) \
             OR string::contains(string::lowercase(location.address), $term) \
             OR string::contains(string::lowercase(location.city), $term) \
             OR string::contains(string::lowercase(location.state), $term))"
                .to_string(),
        );
        binds.push(("term", json!(term.to_lowercase())));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    (where_clause, binds)
}

impl SurrealPropertyRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Insert a fully-formed record verbatim. Seed path for development
    /// fixtures and tests.
    pub async fn seed(&self, record: PropertyRecord) -> Result<()> {
        let doc = PropertyDoc::from_record(&record)?;
        let _: Option<PropertyDoc> = self
            .db
            .create((TABLE, record.id.to_string()))
            .content(doc)
            .await?;
        Ok(())
    }

    async fn fetch_doc(&self, id: Uuid) -> Result<Option<PropertyDoc>> {
        Ok(self.db.select((TABLE, id.to_string())).await?)
    }

    async fn fetch_page(
        &self,
        filter: &PropertyFilter,
        term: Option<&str>,
        page: PageRequest,
    ) -> Result<PagedResult> {
        let (where_clause, binds) = build_clauses(filter, term);

        let count_sql =
            format!("SELECT count() AS total FROM {TABLE}{where_clause} GROUP ALL");
        let page_sql = format!(
            "SELECT * FROM {TABLE}{where_clause} \
             ORDER BY created_ts DESC, property_id ASC \
             LIMIT {} START {}",
            page.per_page(),
            page.offset(),
        );

        let mut query = self.db.query(count_sql).query(page_sql);
        for (key, value) in binds {
            query = query.bind((key, value));
        }
        let mut response = query.await?;

        let counts: Vec<CountRow> = response.take(0)?;
        let total_count = counts.first().map(|c| c.total).unwrap_or(0);
        let docs: Vec<PropertyDoc> = response.take(1)?;
        debug!(total_count, returned = docs.len(), "document listing query");

        let properties = docs
            .into_iter()
            .map(PropertyDoc::into_record)
            .collect::<Result<Vec<_>>>()?;

        Ok(PagedResult {
            properties,
            current_page: page.page(),
            total_pages: total_pages(total_count, page.per_page()),
            total_count,
            per_page: page.per_page(),
        })
    }
}

#[async_trait]
impl PropertyRepository for SurrealPropertyRepository {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult> {
        self.fetch_page(filter, None, page).await
    }

    async fn get(&self, id: Uuid) -> Result<PropertyRecord> {
        self.fetch_doc(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?
            .into_record()
    }

    async fn create(
        &self,
        agent_id: Uuid,
        data: NewProperty,
    ) -> Result<PropertyRecord> {
        let record = data.into_record(agent_id);
        let doc = PropertyDoc::from_record(&record)?;
        let _: Option<PropertyDoc> = self
            .db
            .create((TABLE, record.id.to_string()))
            .content(doc)
            .await?;
        debug!(id = %record.id, "created property document");
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        agent_id: Uuid,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord> {
        let doc = self
            .fetch_doc(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?;
        let mut record = doc.into_record()?;
        if record.agent_id != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }

        patch.apply(&mut record);
        let updated = PropertyDoc::from_record(&record)?;
        let _: Option<PropertyDoc> = self
            .db
            .update((TABLE, id.to_string()))
            .content(updated)
            .await?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid, agent_id: Uuid) -> Result<()> {
        let doc = self
            .fetch_doc(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?;
        let record = doc.into_record()?;
        if record.agent_id != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }

        let _: Option<PropertyDoc> =
            self.db.delete((TABLE, id.to_string())).await?;
        Ok(())
    }

    async fn search(
        &self,
        term: &str,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult> {
        self.fetch_page(filter, Some(term), page).await
    }

    async fn agent_stats(&self, agent_id: Uuid) -> Result<AgentStats> {
        let mut response = self
            .db
            .query(format!(
                "SELECT count() AS total FROM {TABLE} \
                 WHERE agent_id = $agent GROUP ALL"
            ))
            .query(format!(
                "SELECT count() AS total FROM {TABLE} \
                 WHERE agent_id = $agent AND status = 'available' GROUP ALL"
            ))
            .query(format!(
                "SELECT count() AS total FROM {TABLE} \
                 WHERE agent_id = $agent AND status = 'sold' GROUP ALL"
            ))
            .bind(("agent", agent_id.to_string()))
            .await?;

        let total: Vec<CountRow> = response.take(0)?;
        let available: Vec<CountRow> = response.take(1)?;
        let sold: Vec<CountRow> = response.take(2)?;
        let count =
            |rows: Vec<CountRow>| rows.first().map(|c| c.total).unwrap_or(0);

        Ok(AgentStats {
            total: count(total),
            available: count(available),
            sold: count(sold),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_builds_no_where_clause() {
        let (where_clause, binds) =
            build_clauses(&PropertyFilter::default(), None);
        assert!(where_clause.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn clauses_are_and_combined_and_fully_bound() {
        let filter = PropertyFilter {
            types: vec![PropertyType::Condo],
            price_min: Some(Decimal::from(100_000)),
            status: Some(PropertyStatus::Available),
            featured: true,
            ..PropertyFilter::default()
        };

        let (where_clause, binds) = build_clauses(&filter, Some("marina"));
        assert!(where_clause.starts_with(" WHERE "));
        assert!(where_clause.contains("property_type IN $types"));
        assert!(where_clause.contains(" AND price >= $price_min"));
        assert!(where_clause.contains(" AND status = $status"));
        assert!(where_clause.contains(" AND (features.is_featured ?? false) = true"));
        assert!(where_clause.contains("string::contains(string::lowercase(title), $term)"));
        // No literal values may leak into the query text.
        assert!(!where_clause.contains("marina"));
        assert!(!where_clause.contains("condo"));
        assert_eq!(binds.len(), 4);
    }

    #[tokio::test]
    async fn agent_stats_surfaces_store_failures() {
        use surrealdb::engine::local::Mem;

        // No namespace/database selected, so every statement fails; the
        // failure must propagate instead of reading as zero listings.
        let db = Surreal::new::<Mem>(()).await.unwrap();
        let store = SurrealPropertyRepository::new(db);

        let err = store.agent_stats(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Backend(_)));
    }

    #[test]
    fn doc_round_trips_to_the_canonical_record() {
        let record = NewProperty {
            title: "Marina condo".to_string(),
            description: String::new(),
            property_type: PropertyType::Condo,
            price: Decimal::from(890_000),
            location: Location {
                address: "456 Marina Blvd".to_string(),
                city: "Richmond".to_string(),
                state: "CA".to_string(),
                postal_code: "94804".to_string(),
                latitude: None,
                longitude: None,
            },
            features: Features::new(),
            images: vec!["marina-1.jpg".to_string()],
            status: None,
        }
        .into_record(Uuid::new_v4());

        let doc = PropertyDoc::from_record(&record).unwrap();
        assert_eq!(doc.created_ts, record.created_at.timestamp_micros());
        let back = doc.into_record().unwrap();
        assert_eq!(back, record);
    }
}
