//! Recommendation heuristic: narrow available listings by the customer's
//! stored preference profile.
//!
//! This is filter-and-take, not ranked scoring: the profile constrains the
//! query and the newest matches win. A customer without a profile sees the
//! newest available listings.

use hearth_model::{PreferenceProfile, PropertyStatus};

use crate::catalog::filter::PropertyFilter;

/// Build the listing filter for a customer's profile. Each budget bound is
/// applied independently when present, so a one-sided budget still
/// constrains that side.
pub fn preference_filter(profile: Option<&PreferenceProfile>) -> PropertyFilter {
    let mut filter = PropertyFilter {
        status: Some(PropertyStatus::Available),
        ..PropertyFilter::default()
    };

    let Some(profile) = profile else {
        return filter;
    };

    if let Some(types) = &profile.property_types {
        filter.types = types.clone();
    }
    filter.price_min = profile.budget_min;
    filter.price_max = profile.budget_max;
    filter.bedrooms_min = profile.bedrooms;
    filter.bathrooms_min = profile.bathrooms;

    filter
}

#[cfg(test)]
mod tests {
    use hearth_model::PropertyType;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn no_profile_degrades_to_all_available() {
        let filter = preference_filter(None);
        assert_eq!(filter.status, Some(PropertyStatus::Available));
        assert!(filter.types.is_empty());
        assert_eq!(filter.price_min, None);
        assert_eq!(filter.price_max, None);
    }

    #[test]
    fn full_profile_constrains_every_axis() {
        let profile = PreferenceProfile {
            property_types: Some(vec![
                PropertyType::House,
                PropertyType::Townhouse,
            ]),
            budget_min: Some(Decimal::from(200_000)),
            budget_max: Some(Decimal::from(450_000)),
            bedrooms: Some(3),
            bathrooms: Some(2),
        };

        let filter = preference_filter(Some(&profile));
        assert_eq!(
            filter.types,
            vec![PropertyType::House, PropertyType::Townhouse]
        );
        assert_eq!(filter.price_min, Some(Decimal::from(200_000)));
        assert_eq!(filter.price_max, Some(Decimal::from(450_000)));
        assert_eq!(filter.bedrooms_min, Some(3));
        assert_eq!(filter.bathrooms_min, Some(2));
        assert_eq!(filter.status, Some(PropertyStatus::Available));
    }

    #[test]
    fn one_sided_budget_applies_only_that_bound() {
        let profile = PreferenceProfile {
            budget_min: Some(Decimal::from(300_000)),
            ..PreferenceProfile::default()
        };

        let filter = preference_filter(Some(&profile));
        assert_eq!(filter.price_min, Some(Decimal::from(300_000)));
        assert_eq!(filter.price_max, None);
    }
}
