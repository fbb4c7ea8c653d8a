//! Similarity heuristic: comparable listings share the reference's type,
//! sit inside a +/-20% price band, and are in the same city.

use hearth_model::{PropertyRecord, PropertyStatus};
use rust_decimal::Decimal;

use crate::catalog::filter::PropertyFilter;

/// Derive the comparable-listings filter for `reference`.
///
/// Only available listings qualify and the reference itself is excluded.
/// There is no fallback relaxation: if nothing sits in the band, the
/// similarity query legitimately returns nothing.
pub fn similarity_filter(reference: &PropertyRecord) -> PropertyFilter {
    let band_low = reference.price * Decimal::new(8, 1);
    let band_high = reference.price * Decimal::new(12, 1);

    PropertyFilter {
        types: vec![reference.property_type],
        price_min: Some(band_low),
        price_max: Some(band_high),
        city_exact: Some(reference.location.city.clone()),
        status: Some(PropertyStatus::Available),
        exclude_id: Some(reference.id),
        ..PropertyFilter::default()
    }
}

#[cfg(test)]
mod tests {
    use hearth_model::{Features, Location, NewProperty, PropertyType};
    use uuid::Uuid;

    use super::*;

    fn listing(ty: PropertyType, price: i64, city: &str) -> PropertyRecord {
        NewProperty {
            title: format!("{ty} in {city}"),
            description: String::new(),
            property_type: ty,
            price: Decimal::from(price),
            location: Location {
                address: "1 Main St".to_string(),
                city: city.to_string(),
                state: "IL".to_string(),
                postal_code: String::new(),
                latitude: None,
                longitude: None,
            },
            features: Features::new(),
            images: Vec::new(),
            status: None,
        }
        .into_record(Uuid::new_v4())
    }

    #[test]
    fn band_is_twenty_percent_inclusive() {
        let reference = listing(PropertyType::House, 500_000, "Springfield");
        let filter = similarity_filter(&reference);

        assert_eq!(filter.price_min, Some(Decimal::from(400_000)));
        assert_eq!(filter.price_max, Some(Decimal::from(600_000)));
        assert_eq!(filter.types, vec![PropertyType::House]);
        assert_eq!(filter.city_exact.as_deref(), Some("Springfield"));
        assert_eq!(filter.status, Some(PropertyStatus::Available));
        assert_eq!(filter.exclude_id, Some(reference.id));
    }

    #[test]
    fn filter_admits_in_band_same_type_and_rejects_the_rest() {
        let a = listing(PropertyType::House, 500_000, "Springfield");
        let b = listing(PropertyType::House, 520_000, "Springfield");
        let c = listing(PropertyType::Condo, 510_000, "Springfield");
        let far = listing(PropertyType::House, 700_000, "Springfield");
        let elsewhere = listing(PropertyType::House, 520_000, "Shelbyville");

        let filter = similarity_filter(&a);
        assert!(filter.matches(&b));
        assert!(!filter.matches(&c), "type mismatch must be rejected");
        assert!(!filter.matches(&a), "the reference excludes itself");
        assert!(!filter.matches(&far), "price outside the band");
        assert!(!filter.matches(&elsewhere), "different city");
    }
}
