//! Backend-agnostic filter specification.
//!
//! Raw, loosely-typed query input is normalized here into one immutable
//! predicate set that every backend applies verbatim. Backends never
//! special-case on filter presence beyond "apply constraint if present"; in
//! particular the public-query status default is decided here, not in any
//! store.
//!
//! [`PropertyFilter::matches`] is the reference semantics of the predicate
//! set: the in-memory backend executes it directly, and the SQL/document
//! translations are expected to agree with it record for record.

use std::collections::HashMap;

use hearth_model::{PropertyRecord, PropertyStatus, PropertyType};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CatalogError, Result};

/// Normalized, AND-combined query predicates over property records.
///
/// Absent fields place no constraint. Inverted price bounds (min > max) are
/// deliberately kept rather than rejected: they match nothing, which is the
/// fail-open behavior callers rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    /// Acceptable property types; empty means unconstrained. A plain
    /// single-type equality filter carries one entry, the recommendation
    /// scorer's allowed-type list carries several.
    pub types: Vec<PropertyType>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub bedrooms_min: Option<u32>,
    pub bathrooms_min: Option<u32>,
    /// Case-insensitive substring match on the listing city.
    pub city: Option<String>,
    /// Case-insensitive substring match on the listing state.
    pub state: Option<String>,
    /// Exact city equality; used by the similarity matcher.
    pub city_exact: Option<String>,
    pub agent_id: Option<Uuid>,
    pub status: Option<PropertyStatus>,
    /// Restrict to listings flagged `is_featured` in their features map.
    pub featured: bool,
    /// Excluded record id; used by the similarity matcher to drop the
    /// reference listing from its own results.
    pub exclude_id: Option<Uuid>,
}

fn malformed(field: &'static str, value: &str) -> CatalogError {
    CatalogError::MalformedFilter {
        field,
        value: value.to_string(),
    }
}

impl PropertyFilter {
    /// Normalize raw key/value query input.
    ///
    /// Recognized keys: `property_type`, `price_min`, `price_max`,
    /// `bedrooms`, `bathrooms`, `city`, `state`, `agent_id`, `status`.
    /// Unrecognized keys are ignored. Unparseable numeric or enum values
    /// fail with [`CatalogError::MalformedFilter`] naming the field.
    ///
    /// Public-query defaulting happens here: when neither `status` nor
    /// `agent_id` is supplied the filter is restricted to `available`
    /// listings. An agent browsing their own portfolio (`agent_id` present)
    /// gets no implicit status restriction.
    pub fn from_raw(raw: &HashMap<String, String>) -> Result<Self> {
        let mut filter = PropertyFilter::default();

        if let Some(value) = raw.get("property_type") {
            let ty = PropertyType::parse(value)
                .ok_or_else(|| malformed("property_type", value))?;
            filter.types.push(ty);
        }
        if let Some(value) = raw.get("price_min") {
            let min: Decimal =
                value.parse().map_err(|_| malformed("price_min", value))?;
            filter.price_min = Some(min);
        }
        if let Some(value) = raw.get("price_max") {
            let max: Decimal =
                value.parse().map_err(|_| malformed("price_max", value))?;
            filter.price_max = Some(max);
        }
        if let Some(value) = raw.get("bedrooms") {
            let bedrooms: u32 =
                value.parse().map_err(|_| malformed("bedrooms", value))?;
            filter.bedrooms_min = Some(bedrooms);
        }
        if let Some(value) = raw.get("bathrooms") {
            let bathrooms: u32 =
                value.parse().map_err(|_| malformed("bathrooms", value))?;
            filter.bathrooms_min = Some(bathrooms);
        }
        if let Some(value) = raw.get("city") {
            filter.city = Some(value.clone());
        }
        if let Some(value) = raw.get("state") {
            filter.state = Some(value.clone());
        }
        if let Some(value) = raw.get("agent_id") {
            let agent: Uuid =
                value.parse().map_err(|_| malformed("agent_id", value))?;
            filter.agent_id = Some(agent);
        }
        if let Some(value) = raw.get("status") {
            let status = PropertyStatus::parse(value)
                .ok_or_else(|| malformed("status", value))?;
            filter.status = Some(status);
        }

        if filter.status.is_none() && filter.agent_id.is_none() {
            filter.status = Some(PropertyStatus::Available);
        }

        Ok(filter)
    }

    /// Reference predicate semantics: does `record` satisfy every present
    /// constraint?
    pub fn matches(&self, record: &PropertyRecord) -> bool {
        if !self.types.is_empty() && !self.types.contains(&record.property_type)
        {
            return false;
        }
        if let Some(min) = self.price_min {
            if record.price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if record.price > max {
                return false;
            }
        }
        if let Some(min) = self.bedrooms_min {
            if !feature_at_least(record, "bedrooms", min) {
                return false;
            }
        }
        if let Some(min) = self.bathrooms_min {
            if !feature_at_least(record, "bathrooms", min) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !contains_ignore_case(&record.location.city, city) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !contains_ignore_case(&record.location.state, state) {
                return false;
            }
        }
        if let Some(city) = &self.city_exact {
            if record.location.city != *city {
                return false;
            }
        }
        if let Some(agent_id) = self.agent_id {
            if record.agent_id != agent_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if self.featured && !is_featured(record) {
            return false;
        }
        if let Some(excluded) = self.exclude_id {
            if record.id == excluded {
                return false;
            }
        }
        true
    }
}

/// OR-combined free-text match over title, description, and address parts.
/// A record with no textual hit anywhere does not match.
pub fn matches_search_term(record: &PropertyRecord, term: &str) -> bool {
    contains_ignore_case(&record.title, term)
        || contains_ignore_case(&record.description, term)
        || contains_ignore_case(&record.location.address, term)
        || contains_ignore_case(&record.location.city, term)
        || contains_ignore_case(&record.location.state, term)
}

/// A listing is featured only when its features map carries an explicit
/// `is_featured: true`; absent or non-boolean values mean not featured.
fn is_featured(record: &PropertyRecord) -> bool {
    record
        .features
        .get("is_featured")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A feature counts toward a minimum only when it is present and numeric;
/// a listing without a `bedrooms` entry never satisfies a bedroom minimum.
fn feature_at_least(record: &PropertyRecord, key: &str, min: u32) -> bool {
    record
        .features
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .is_some_and(|value| value >= f64::from(min))
}

#[cfg(test)]
mod tests {
    use hearth_model::{Features, Location, NewProperty};

    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn record(price: i64, city: &str) -> PropertyRecord {
        let mut features = Features::new();
        features.insert("bedrooms".to_string(), serde_json::json!(3));
        features.insert("bathrooms".to_string(), serde_json::json!(2.5));
        NewProperty {
            title: "Sunny craftsman".to_string(),
            description: "Close to the park".to_string(),
            property_type: PropertyType::House,
            price: Decimal::from(price),
            location: Location {
                address: "12 Elm St".to_string(),
                city: city.to_string(),
                state: "IL".to_string(),
                postal_code: "62704".to_string(),
                latitude: None,
                longitude: None,
            },
            features,
            images: Vec::new(),
            status: None,
        }
        .into_record(Uuid::new_v4())
    }

    #[test]
    fn recognized_keys_parse_and_unrecognized_are_ignored() {
        let filter = PropertyFilter::from_raw(&raw(&[
            ("property_type", "house"),
            ("price_min", "100000"),
            ("price_max", "300000"),
            ("bedrooms", "2"),
            ("bathrooms", "1"),
            ("city", "Springfield"),
            ("sort", "price"),
            ("utm_source", "newsletter"),
        ]))
        .unwrap();

        assert_eq!(filter.types, vec![PropertyType::House]);
        assert_eq!(filter.price_min, Some(Decimal::from(100_000)));
        assert_eq!(filter.price_max, Some(Decimal::from(300_000)));
        assert_eq!(filter.bedrooms_min, Some(2));
        assert_eq!(filter.bathrooms_min, Some(1));
        assert_eq!(filter.city.as_deref(), Some("Springfield"));
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let err =
            PropertyFilter::from_raw(&raw(&[("price_max", "cheap")])).unwrap_err();
        match err {
            CatalogError::MalformedFilter { field, value } => {
                assert_eq!(field, "price_max");
                assert_eq!(value, "cheap");
            }
            other => panic!("expected MalformedFilter, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_bedrooms_is_malformed() {
        let err =
            PropertyFilter::from_raw(&raw(&[("bedrooms", "many")])).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MalformedFilter { field: "bedrooms", .. }
        ));
    }

    #[test]
    fn unknown_enum_values_are_malformed() {
        assert!(PropertyFilter::from_raw(&raw(&[("property_type", "yurt")]))
            .is_err());
        assert!(PropertyFilter::from_raw(&raw(&[("status", "haunted")])).is_err());
        assert!(
            PropertyFilter::from_raw(&raw(&[("agent_id", "not-a-uuid")])).is_err()
        );
    }

    #[test]
    fn public_queries_default_to_available() {
        let filter = PropertyFilter::from_raw(&raw(&[])).unwrap();
        assert_eq!(filter.status, Some(PropertyStatus::Available));
    }

    #[test]
    fn owner_queries_get_no_implicit_status() {
        let agent = Uuid::new_v4();
        let filter =
            PropertyFilter::from_raw(&raw(&[("agent_id", &agent.to_string())]))
                .unwrap();
        assert_eq!(filter.agent_id, Some(agent));
        assert_eq!(filter.status, None);
    }

    #[test]
    fn explicit_status_is_respected() {
        let filter =
            PropertyFilter::from_raw(&raw(&[("status", "sold")])).unwrap();
        assert_eq!(filter.status, Some(PropertyStatus::Sold));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            price_min: Some(Decimal::from(250_000)),
            price_max: Some(Decimal::from(250_000)),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&listing));
    }

    #[test]
    fn inverted_price_bounds_match_nothing() {
        let listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            price_min: Some(Decimal::from(400_000)),
            price_max: Some(Decimal::from(300_000)),
            ..PropertyFilter::default()
        };
        assert!(!filter.matches(&listing));
    }

    #[test]
    fn city_substring_is_case_insensitive() {
        let listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            city: Some("spring".to_string()),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&listing));
    }

    #[test]
    fn city_exact_requires_equality() {
        let listing = record(250_000, "Springfield");
        let substring = PropertyFilter {
            city_exact: Some("Spring".to_string()),
            ..PropertyFilter::default()
        };
        assert!(!substring.matches(&listing));

        let exact = PropertyFilter {
            city_exact: Some("Springfield".to_string()),
            ..PropertyFilter::default()
        };
        assert!(exact.matches(&listing));
    }

    #[test]
    fn missing_feature_fails_a_minimum() {
        let mut listing = record(250_000, "Springfield");
        listing.features.remove("bedrooms");
        let filter = PropertyFilter {
            bedrooms_min: Some(1),
            ..PropertyFilter::default()
        };
        assert!(!filter.matches(&listing));
    }

    #[test]
    fn fractional_bathrooms_satisfy_integer_minimum() {
        let listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            bathrooms_min: Some(2),
            ..PropertyFilter::default()
        };
        assert!(filter.matches(&listing));
    }

    #[test]
    fn featured_requires_the_explicit_flag() {
        let mut listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            featured: true,
            ..PropertyFilter::default()
        };
        assert!(!filter.matches(&listing), "no flag means not featured");

        listing
            .features
            .insert("is_featured".to_string(), serde_json::json!(true));
        assert!(filter.matches(&listing));

        listing
            .features
            .insert("is_featured".to_string(), serde_json::json!("yes"));
        assert!(!filter.matches(&listing), "non-boolean flag does not count");
    }

    #[test]
    fn exclude_id_drops_the_reference() {
        let listing = record(250_000, "Springfield");
        let filter = PropertyFilter {
            exclude_id: Some(listing.id),
            ..PropertyFilter::default()
        };
        assert!(!filter.matches(&listing));
    }

    #[test]
    fn search_term_matches_across_text_fields() {
        let listing = record(250_000, "Springfield");
        assert!(matches_search_term(&listing, "craftsman"));
        assert!(matches_search_term(&listing, "PARK"));
        assert!(matches_search_term(&listing, "elm"));
        assert!(!matches_search_term(&listing, "penthouse"));
    }
}
