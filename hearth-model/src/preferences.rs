use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::property::PropertyType;

/// A customer's stored search preferences.
///
/// Owned by the customer-profile collaborator; the catalog only reads it to
/// narrow recommendation queries. Every field is optional - an absent field
/// places no constraint, and a customer with no profile at all simply sees
/// the newest available listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_types: Option<Vec<PropertyType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
}
