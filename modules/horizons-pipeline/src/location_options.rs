//! Location filter options with occurrence counts.
//!
//! One pass over the collectives fills four counting maps (regions, countries,
//! domestic regions, cities). Counts are per field occurrence, so a collective
//! with both a city and a country adds one to each.
//!
//! Output order:
//! 1. `All locations` sentinel (section `all`).
//! 2. Every city, most popular first, ties by label (section `cities`).
//! 3. Regions alphabetically, each followed by its countries alphabetically,
//!    each followed by its domestic regions alphabetically (section `regions`).
//!    Countries with no listed region, then domestic regions with no listed
//!    country, close the list.

use std::collections::{BTreeSet, HashMap};

use horizons_common::{Collective, CountryTable, LocationKind, LocationOption, LocationSection};

pub const ALL_LOCATIONS_LABEL: &str = "All locations";

#[derive(Debug, Default)]
struct Tally {
    count: usize,
    region: Option<String>,
    country: Option<String>,
}

impl Tally {
    fn record(&mut self, region: Option<&String>, country: Option<&String>) {
        self.count += 1;
        if let Some(region) = region {
            self.region = Some(region.clone());
        }
        if let Some(country) = country {
            self.country = Some(country.clone());
        }
    }
}

#[derive(Debug, Default)]
struct FoundLocations {
    regions: HashMap<String, Tally>,
    countries: HashMap<String, Tally>,
    domestic_regions: HashMap<String, Tally>,
    cities: HashMap<String, Tally>,
}

pub fn get_filter_options<'a, I>(collectives: I, countries: &CountryTable) -> Vec<LocationOption>
where
    I: IntoIterator<Item = &'a Collective>,
{
    let mut found = FoundLocations::default();
    let mut total = 0usize;

    for c in collectives {
        total += 1;
        let Some(loc) = &c.location else {
            continue;
        };
        let region = loc.region.as_ref().filter(|s| !s.is_empty());
        let country = loc.country_code.as_ref().filter(|s| !s.is_empty());

        if let Some(r) = region {
            found.regions.entry(r.clone()).or_default().record(None, None);
        }
        if let Some(code) = country {
            found.countries.entry(code.clone()).or_default().record(region, None);
        }
        if let Some(d) = loc.domestic_region.as_ref().filter(|s| !s.is_empty()) {
            found
                .domestic_regions
                .entry(d.clone())
                .or_default()
                .record(region, country);
        }
        if let Some(city) = loc.city.as_ref().filter(|s| !s.is_empty()) {
            found.cities.entry(city.clone()).or_default().record(region, country);
        }
    }

    let mut options = Vec::with_capacity(
        1 + found.regions.len()
            + found.countries.len()
            + found.domestic_regions.len()
            + found.cities.len(),
    );
    options.push(LocationOption {
        kind: None,
        value: String::new(),
        label: ALL_LOCATIONS_LABEL.to_string(),
        count: total,
        section: LocationSection::All,
        region: None,
        country: None,
    });

    // --- Cities by popularity ---
    let mut cities: Vec<_> = found.cities.into_iter().collect();
    cities.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    for (city, tally) in cities {
        options.push(LocationOption {
            kind: Some(LocationKind::City),
            label: city.clone(),
            value: city,
            count: tally.count,
            section: LocationSection::Cities,
            region: tally.region,
            country: tally.country,
        });
    }

    // --- Region → country → domestic region hierarchy ---
    let mut country_options: Vec<LocationOption> = found
        .countries
        .into_iter()
        .map(|(code, tally)| {
            let region = countries
                .lookup(&code)
                .map(|c| c.region.to_string())
                .or(tally.region);
            LocationOption {
                kind: Some(LocationKind::Country),
                label: countries.label(&code),
                value: code,
                count: tally.count,
                section: LocationSection::Regions,
                region,
                country: None,
            }
        })
        .collect();
    country_options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));

    let mut domestic_options: Vec<LocationOption> = found
        .domestic_regions
        .into_iter()
        .map(|(value, tally)| LocationOption {
            kind: Some(LocationKind::DomesticRegion),
            label: value.clone(),
            value,
            count: tally.count,
            section: LocationSection::Regions,
            region: tally.region,
            country: tally.country,
        })
        .collect();
    domestic_options.sort_by(|a, b| a.label.cmp(&b.label));

    let mut regions: Vec<_> = found.regions.into_iter().collect();
    regions.sort_by(|a, b| a.0.cmp(&b.0));
    let region_names: BTreeSet<&str> = regions.iter().map(|(r, _)| r.as_str()).collect();
    let country_codes: BTreeSet<String> =
        country_options.iter().map(|c| c.value.clone()).collect();

    let push_country = |options: &mut Vec<LocationOption>, country: &LocationOption| {
        options.push(country.clone());
        options.extend(
            domestic_options
                .iter()
                .filter(|d| d.country.as_deref() == Some(country.value.as_str()))
                .cloned(),
        );
    };

    for (region, tally) in &regions {
        options.push(LocationOption {
            kind: Some(LocationKind::Region),
            value: region.clone(),
            label: region.clone(),
            count: tally.count,
            section: LocationSection::Regions,
            region: None,
            country: None,
        });
        for country in country_options
            .iter()
            .filter(|c| c.region.as_deref() == Some(region.as_str()))
        {
            push_country(&mut options, country);
        }
    }

    for country in country_options.iter().filter(|c| {
        c.region
            .as_deref()
            .map_or(true, |r| !region_names.contains(r))
    }) {
        push_country(&mut options, country);
    }

    options.extend(
        domestic_options
            .iter()
            .filter(|d| {
                d.country
                    .as_ref()
                    .map_or(true, |code| !country_codes.contains(code))
            })
            .cloned(),
    );

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collective, location, CollectiveExt};

    fn sample() -> Vec<Collective> {
        vec![
            collective("a").located(location("Europe", "FR", "", "Paris")),
            collective("b").located(location("Europe", "DE", "", "Berlin")),
            collective("c").located(location("Europe", "FR", "", "Paris")),
            collective("d").located(location("North America", "US", "IL", "Chicago")),
            collective("e").located(location("North America", "US", "IL", "")),
            collective("f"),
        ]
    }

    fn values(options: &[LocationOption], kind: LocationKind) -> Vec<(String, usize)> {
        options
            .iter()
            .filter(|o| o.kind.as_ref() == Some(&kind))
            .map(|o| (o.value.clone(), o.count))
            .collect()
    }

    #[test]
    fn sentinel_comes_first_with_total_count() {
        let options = get_filter_options(&sample(), &CountryTable::default());
        let first = &options[0];
        assert_eq!(first.kind, None);
        assert_eq!(first.value, "");
        assert_eq!(first.label, ALL_LOCATIONS_LABEL);
        assert_eq!(first.count, 6);
        assert_eq!(first.section, LocationSection::All);
    }

    #[test]
    fn cities_are_ranked_by_popularity() {
        let options = get_filter_options(&sample(), &CountryTable::default());
        assert_eq!(
            values(&options, LocationKind::City),
            vec![
                ("Paris".to_string(), 2),
                ("Berlin".to_string(), 1),
                ("Chicago".to_string(), 1),
            ]
        );
        assert!(options
            .iter()
            .filter(|o| o.kind == Some(LocationKind::City))
            .all(|o| o.section == LocationSection::Cities));
    }

    #[test]
    fn hierarchy_nests_countries_and_domestic_regions() {
        let options = get_filter_options(&sample(), &CountryTable::default());
        let hierarchy: Vec<&str> = options
            .iter()
            .filter(|o| o.section == LocationSection::Regions)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(
            hierarchy,
            vec!["Europe", "France", "Germany", "North America", "USA", "IL"]
        );
    }

    #[test]
    fn counts_are_occurrence_counts() {
        let options = get_filter_options(&sample(), &CountryTable::default());
        assert_eq!(
            values(&options, LocationKind::Region),
            vec![("Europe".to_string(), 3), ("North America".to_string(), 2)]
        );
        assert_eq!(
            values(&options, LocationKind::Country),
            vec![
                ("FR".to_string(), 2),
                ("DE".to_string(), 1),
                ("US".to_string(), 2),
            ]
        );
        assert_eq!(
            values(&options, LocationKind::DomesticRegion),
            vec![("IL".to_string(), 2)]
        );
    }

    #[test]
    fn every_value_appears_exactly_once() {
        let mut all = sample();
        // Unknown country code, region missing from the collectives.
        all.push(collective("g").located(location("", "ZZ", "", "Atlantis")));
        // Domestic region without a country.
        all.push(collective("h").located(location("", "", "XX", "")));
        let options = get_filter_options(&all, &CountryTable::default());

        for kind in [
            LocationKind::Region,
            LocationKind::Country,
            LocationKind::DomesticRegion,
            LocationKind::City,
        ] {
            let vals: Vec<_> = values(&options, kind.clone())
                .into_iter()
                .map(|(v, _)| v)
                .collect();
            let unique: BTreeSet<_> = vals.iter().collect();
            assert_eq!(vals.len(), unique.len(), "duplicates for {kind}");
        }
        assert!(options.iter().any(|o| o.value == "ZZ" && o.label == "ZZ"));
        assert!(options.iter().any(|o| o.value == "XX"));
        assert!(options.iter().any(|o| o.value == "Atlantis"));
    }

    #[test]
    fn empty_input_yields_only_sentinel() {
        let options = get_filter_options(&Vec::<Collective>::new(), &CountryTable::default());
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].count, 0);
    }
}
