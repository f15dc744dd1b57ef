//! Location matching.
//!
//! Rules:
//! 1. No filter, a null type, or an empty value → match (identity filter).
//! 2. Otherwise the filter's field (`region`, `countryCode`, `domesticRegion`,
//!    `city`) must equal the filter value exactly.
//! 3. A missing location or missing field → no match.
//! 4. An unrecognized filter type → no match (fail closed).

use horizons_common::{Collective, Location, LocationFilter};

pub fn matches(location: Option<&Location>, filter: Option<&LocationFilter>) -> bool {
    let Some(filter) = filter.filter(|f| !f.is_identity()) else {
        return true;
    };
    let (Some(kind), Some(value)) = (filter.kind.as_ref(), filter.value.as_deref()) else {
        return true;
    };

    location
        .and_then(|loc| loc.field(kind))
        .is_some_and(|field| field == value)
}

/// Keep the collectives matching `filter`, in their original order.
pub fn filter_location<'a, I>(collectives: I, filter: Option<&LocationFilter>) -> Vec<&'a Collective>
where
    I: IntoIterator<Item = &'a Collective>,
{
    collectives
        .into_iter()
        .filter(|c| matches(c.location.as_ref(), filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collective, location, CollectiveExt};
    use horizons_common::LocationKind;

    fn paris() -> Location {
        location("Europe", "FR", "", "Paris")
    }

    fn chicago() -> Location {
        location("North America", "US", "IL", "Chicago")
    }

    fn sample() -> Vec<Collective> {
        vec![
            collective("a").located(paris()),
            collective("b").located(chicago()),
            collective("c"),
            collective("d").located(Location::default()),
            collective("e").located(paris()),
        ]
    }

    fn slugs(list: &[&Collective]) -> Vec<String> {
        list.iter().map(|c| c.slug.clone()).collect()
    }

    #[test]
    fn no_filter_matches_everything() {
        assert!(matches(None, None));
        assert!(matches(Some(&paris()), None));
    }

    #[test]
    fn empty_value_is_identity() {
        let f = LocationFilter::new("region", "");
        assert!(matches(None, Some(&f)));
    }

    #[test]
    fn null_type_is_identity() {
        let f = LocationFilter {
            kind: None,
            value: Some("Europe".to_string()),
        };
        assert!(matches(None, Some(&f)));
    }

    #[test]
    fn each_kind_compares_its_field() {
        let loc = chicago();
        assert!(matches(Some(&loc), Some(&LocationFilter::new("region", "North America"))));
        assert!(matches(Some(&loc), Some(&LocationFilter::new("country", "US"))));
        assert!(matches(Some(&loc), Some(&LocationFilter::new("countryCode", "US"))));
        assert!(matches(Some(&loc), Some(&LocationFilter::new("domesticRegion", "IL"))));
        assert!(matches(Some(&loc), Some(&LocationFilter::new("city", "Chicago"))));
        assert!(!matches(Some(&loc), Some(&LocationFilter::new("city", "chicago"))));
    }

    #[test]
    fn missing_location_or_field_never_matches() {
        let f = LocationFilter::new("domesticRegion", "IL");
        assert!(!matches(None, Some(&f)));
        assert!(!matches(Some(&paris()), Some(&f)));
        assert!(!matches(Some(&Location::default()), Some(&f)));
    }

    #[test]
    fn unrecognized_type_fails_closed() {
        let f = LocationFilter {
            kind: Some(LocationKind::Unrecognized("planet".to_string())),
            value: Some("Earth".to_string()),
        };
        assert!(!matches(Some(&paris()), Some(&f)));
    }

    #[test]
    fn filter_preserves_order() {
        let all = sample();
        let filtered = filter_location(&all, Some(&LocationFilter::new("country", "FR")));
        assert_eq!(slugs(&filtered), vec!["a", "e"]);
    }

    #[test]
    fn identity_filter_returns_input() {
        let all = sample();
        let identity = LocationFilter {
            kind: None,
            value: Some(String::new()),
        };
        let filtered = filter_location(&all, Some(&identity));
        assert_eq!(slugs(&filtered), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = sample();
        let filters = [
            LocationFilter::new("region", "Europe"),
            LocationFilter::new("city", "Chicago"),
            LocationFilter::new("planet", "Earth"),
            LocationFilter::default(),
        ];
        for f in &filters {
            let once = filter_location(&all, Some(f));
            let twice = filter_location(once.iter().copied(), Some(f));
            assert_eq!(slugs(&once), slugs(&twice), "filter {f:?}");
        }
    }
}
