use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_model::{
    AgentStats, Features, Location, NewProperty, PagedResult, PropertyPatch,
    PropertyRecord, PropertyStatus, PropertyType,
};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::filter::PropertyFilter;
use crate::catalog::pagination::{total_pages, PageRequest};
use crate::database::ports::PropertyRepository;
use crate::error::{CatalogError, Result};

const SELECT_COLUMNS: &str = "SELECT id, agent_id, title, description, \
     property_type, price, location, features, images, status, created_at, \
     updated_at FROM properties";

#[derive(Clone, Debug)]
pub struct PostgresPropertyRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    agent_id: Uuid,
    title: String,
    description: String,
    property_type: String,
    price: Decimal,
    location: Json<Location>,
    features: Json<Features>,
    images: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    fn into_record(self) -> Result<PropertyRecord> {
        let property_type =
            PropertyType::parse(&self.property_type).ok_or_else(|| {
                CatalogError::Backend(format!(
                    "unknown property_type {:?} stored for {}",
                    self.property_type, self.id
                ))
            })?;
        let status = PropertyStatus::parse(&self.status).ok_or_else(|| {
            CatalogError::Backend(format!(
                "unknown status {:?} stored for {}",
                self.status, self.id
            ))
        })?;

        Ok(PropertyRecord {
            id: self.id,
            agent_id: self.agent_id,
            title: self.title,
            description: self.description,
            property_type,
            price: self.price,
            location: self.location.0,
            features: self.features.0,
            images: self.images,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Translate the filter (and optional search term) into parameterized
/// predicate clauses. The same translation feeds both the COUNT query and
/// the page query so their totals can never drift apart.
fn push_predicates(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &PropertyFilter,
    term: Option<&str>,
) {
    query.push(" WHERE TRUE");

    if !filter.types.is_empty() {
        let types: Vec<String> =
            filter.types.iter().map(|t| t.as_str().to_string()).collect();
        query.push(" AND property_type = ANY(").push_bind(types).push(")");
    }
    if let Some(min) = filter.price_min {
        query.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.price_max {
        query.push(" AND price <= ").push_bind(max);
    }
    if let Some(min) = filter.bedrooms_min {
        query
            .push(" AND (features->>'bedrooms')::numeric >= ")
            .push_bind(Decimal::from(min));
    }
    if let Some(min) = filter.bathrooms_min {
        query
            .push(" AND (features->>'bathrooms')::numeric >= ")
            .push_bind(Decimal::from(min));
    }
    if let Some(city) = &filter.city {
        query
            .push(" AND location->>'city' ILIKE ")
            .push_bind(format!("%{city}%"));
    }
    if let Some(state) = &filter.state {
        query
            .push(" AND location->>'state' ILIKE ")
            .push_bind(format!("%{state}%"));
    }
    if let Some(city) = &filter.city_exact {
        query.push(" AND location->>'city' = ").push_bind(city.clone());
    }
    if let Some(agent_id) = filter.agent_id {
        query.push(" AND agent_id = ").push_bind(agent_id);
    }
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str().to_string());
    }
    if filter.featured {
        query.push(" AND (features->>'is_featured')::boolean IS TRUE");
    }
    if let Some(excluded) = filter.exclude_id {
        query.push(" AND id <> ").push_bind(excluded);
    }

    if let Some(term) = term {
        let pattern = format!("%{term}%");
        query
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location->>'address' ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location->>'city' ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location->>'state' ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl PostgresPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        filter: &PropertyFilter,
        term: Option<&str>,
        page: PageRequest,
    ) -> Result<PagedResult> {
        let mut count_query =
            QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_predicates(&mut count_query, filter, term);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        let total_count = u64::try_from(total).unwrap_or(0);

        let mut page_query = QueryBuilder::new(SELECT_COLUMNS);
        push_predicates(&mut page_query, filter, term);
        page_query
            .push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(i64::from(page.per_page()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows: Vec<PropertyRow> =
            page_query.build_query_as().fetch_all(&self.pool).await?;
        debug!(total_count, returned = rows.len(), "postgres listing query");

        let properties = rows
            .into_iter()
            .map(PropertyRow::into_record)
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
impl PropertyRepository for PostgresPropertyRepository {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: PageRequest,
    ) -> Result<PagedResult> {
        self.fetch_page(filter, None, page).await
    }

    async fn get(&self, id: Uuid) -> Result<PropertyRecord> {
        let row: Option<PropertyRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?
            .into_record()
    }

    async fn create(
        &self,
        agent_id: Uuid,
        data: NewProperty,
    ) -> Result<PropertyRecord> {
        let record = data.into_record(agent_id);

        sqlx::query(
            "INSERT INTO properties (id, agent_id, title, description, \
             property_type, price, location, features, images, status, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(record.id)
        .bind(record.agent_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.property_type.as_str())
        .bind(record.price)
        .bind(Json(&record.location))
        .bind(Json(&record.features))
        .bind(&record.images)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %record.id, "created property row");
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        agent_id: Uuid,
        patch: PropertyPatch,
    ) -> Result<PropertyRecord> {
        let mut tx = self.pool.begin().await?;

        let row: Option<PropertyRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1 FOR UPDATE"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let mut record = row
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?
            .into_record()?;
        if record.agent_id != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }

        patch.apply(&mut record);

        sqlx::query(
            "UPDATE properties SET title = $1, description = $2, \
             property_type = $3, price = $4, location = $5, features = $6, \
             images = $7, status = $8, updated_at = $9 WHERE id = $10",
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.property_type.as_str())
        .bind(record.price)
        .bind(Json(&record.location))
        .bind(Json(&record.features))
        .bind(&record.images)
        .bind(record.status.as_str())
        .bind(record.updated_at)
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn delete(&self, id: Uuid, agent_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> = sqlx::query_scalar(
            "SELECT agent_id FROM properties WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let owner = owner
            .ok_or_else(|| CatalogError::NotFound(format!("property {id}")))?;
        if owner != agent_id {
            return Err(CatalogError::Unauthorized(format!(
                "agent {agent_id} does not own property {id}"
            )));
        }

        sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
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
        let (total, available, sold): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
             COUNT(*) FILTER (WHERE status = 'available'), \
             COUNT(*) FILTER (WHERE status = 'sold') \
             FROM properties WHERE agent_id = $1",
        )
        .bind(agent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(AgentStats {
            total: u64::try_from(total).unwrap_or(0),
            available: u64::try_from(available).unwrap_or(0),
            sold: u64::try_from(sold).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_adds_no_predicates() {
        let mut query = QueryBuilder::new(SELECT_COLUMNS);
        push_predicates(&mut query, &PropertyFilter::default(), None);
        assert!(query.sql().ends_with(" WHERE TRUE"));
    }

    #[test]
    fn every_present_predicate_is_parameterized() {
        let filter = PropertyFilter {
            types: vec![hearth_model::PropertyType::House],
            price_min: Some(Decimal::from(100_000)),
            price_max: Some(Decimal::from(300_000)),
            bedrooms_min: Some(2),
            bathrooms_min: Some(1),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            city_exact: None,
            agent_id: Some(Uuid::new_v4()),
            status: Some(PropertyStatus::Available),
            featured: true,
            exclude_id: Some(Uuid::new_v4()),
        };

        let mut query = QueryBuilder::new(SELECT_COLUMNS);
        push_predicates(&mut query, &filter, None);
        let sql = query.sql();

        assert!(sql.contains("property_type = ANY($1)"));
        assert!(sql.contains("price >= $2"));
        assert!(sql.contains("price <= $3"));
        assert!(sql.contains("(features->>'bedrooms')::numeric >= $4"));
        assert!(sql.contains("(features->>'bathrooms')::numeric >= $5"));
        assert!(sql.contains("location->>'city' ILIKE $6"));
        assert!(sql.contains("location->>'state' ILIKE $7"));
        assert!(sql.contains("agent_id = $8"));
        assert!(sql.contains("status = $9"));
        assert!(sql.contains("(features->>'is_featured')::boolean IS TRUE"));
        assert!(sql.contains("id <> $10"));
        // No literal values may leak into the SQL text.
        assert!(!sql.contains("Springfield"));
        assert!(!sql.contains("100000"));
    }

    #[test]
    fn search_term_produces_an_or_block() {
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM properties");
        push_predicates(&mut query, &PropertyFilter::default(), Some("river"));
        let sql = query.sql();

        assert!(sql.contains("(title ILIKE $1"));
        assert!(sql.contains("OR description ILIKE $2"));
        assert!(sql.contains("OR location->>'state' ILIKE $5)"));
        assert!(!sql.contains("river"));
    }
}
