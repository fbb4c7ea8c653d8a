use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Open map of named listing attributes (bedroom count, square footage,
/// boolean amenities). Deliberately schemaless: agents attach whatever the
/// listing warrants.
pub type Features = serde_json::Map<String, serde_json::Value>;

/// Kind of dwelling a listing describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Townhouse,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Commercial => "commercial",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "apartment" => Some(PropertyType::Apartment),
            "house" => Some(PropertyType::House),
            "condo" => Some(PropertyType::Condo),
            "townhouse" => Some(PropertyType::Townhouse),
            "commercial" => Some(PropertyType::Commercial),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Listing lifecycle marker.
///
/// No transition rules are enforced: a `sold` listing may be flipped back to
/// `available`. The permissiveness is intentional and pending product
/// clarification, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
    Rented,
    Withdrawn,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(PropertyStatus::Available),
            "pending" => Some(PropertyStatus::Pending),
            "sold" => Some(PropertyStatus::Sold),
            "rented" => Some(PropertyStatus::Rented),
            "withdrawn" => Some(PropertyStatus::Withdrawn),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured address of a listing. Never free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// One property listing as every backend must produce it.
///
/// `agent_id` is an ownership relation to the listing agent, not an embedded
/// agent object; only that agent may mutate or delete the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub title: String,
    pub description: String,
    pub property_type: PropertyType,
    /// Asking price. Invariant: never negative.
    pub price: Decimal,
    pub location: Location,
    pub features: Features,
    /// Ordered image references.
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a listing. The server assigns the id and both
/// timestamps; absent fields fall back to the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub price: Decimal,
    pub location: Location,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
}

impl NewProperty {
    /// Materialize the payload into a full record owned by `agent_id`,
    /// stamping identity, timestamps, and defaulted status.
    pub fn into_record(self, agent_id: Uuid) -> PropertyRecord {
        let now = Utc::now();
        PropertyRecord {
            id: Uuid::new_v4(),
            agent_id,
            title: self.title,
            description: self.description,
            property_type: self.property_type,
            price: self.price,
            location: self.location,
            features: self.features,
            images: self.images,
            status: self.status.unwrap_or(PropertyStatus::Available),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-wise update patch. `id`, `agent_id`, and `created_at` are never
/// patchable; `updated_at` is re-stamped on apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub price: Option<Decimal>,
    pub location: Option<Location>,
    pub features: Option<Features>,
    pub images: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

impl PropertyPatch {
    pub fn apply(self, record: &mut PropertyRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(property_type) = self.property_type {
            record.property_type = property_type;
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(features) = self.features {
            record.features = features;
        }
        if let Some(images) = self.images {
            record.images = images;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        record.updated_at = Utc::now();
    }
}

/// Listing counts for one agent's portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub total: u64,
    pub available: u64,
    pub sold: u64,
}
