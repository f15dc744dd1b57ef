use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::HorizonsError;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// --- Periods ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodKey {
    All,
    PastYear,
    PastQuarter,
}

impl PeriodKey {
    pub const EVERY: [PeriodKey; 3] = [PeriodKey::All, PeriodKey::PastYear, PeriodKey::PastQuarter];

    /// Bucket granularity of the series for this period. Fixed per period.
    pub fn time_unit(self) -> TimeUnit {
        match self {
            PeriodKey::All => TimeUnit::Year,
            PeriodKey::PastYear => TimeUnit::Month,
            PeriodKey::PastQuarter => TimeUnit::Week,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PeriodKey::All => "ALL",
            PeriodKey::PastYear => "PAST_YEAR",
            PeriodKey::PastQuarter => "PAST_QUARTER",
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKey {
    type Err = HorizonsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(PeriodKey::All),
            "PAST_YEAR" => Ok(PeriodKey::PastYear),
            "PAST_QUARTER" => Ok(PeriodKey::PastQuarter),
            other => Err(HorizonsError::Validation(format!(
                "unknown time period '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Year,
    Month,
    Week,
}

// --- Period statistics ---

/// One bucket of a date-keyed series. `date` is the bucket start as an ISO date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesNode {
    pub date: String,
    pub amount: i64,
}

/// Financial statistics of one collective over one period.
/// Amounts are in minor currency units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raised: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spent: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contributors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contributions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raised_series: Vec<SeriesNode>,
}

impl PeriodStats {
    pub fn percent_disbursed(&self) -> Option<f64> {
        percent_disbursed(self.spent, self.raised)
    }
}

/// `spent / raised * 100`, or `None` when nothing was raised.
pub fn percent_disbursed(spent: i64, raised: i64) -> Option<f64> {
    if raised == 0 {
        return None;
    }
    Some(spent as f64 / raised as f64 * 100.0)
}

/// Per-period statistics keyed the way the snapshot stores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatsByPeriod {
    #[serde(rename = "ALL", default, skip_serializing_if = "Option::is_none")]
    pub all: Option<PeriodStats>,
    #[serde(rename = "PAST_YEAR", default, skip_serializing_if = "Option::is_none")]
    pub past_year: Option<PeriodStats>,
    #[serde(rename = "PAST_QUARTER", default, skip_serializing_if = "Option::is_none")]
    pub past_quarter: Option<PeriodStats>,
}

impl StatsByPeriod {
    pub fn get(&self, period: PeriodKey) -> Option<&PeriodStats> {
        match period {
            PeriodKey::All => self.all.as_ref(),
            PeriodKey::PastYear => self.past_year.as_ref(),
            PeriodKey::PastQuarter => self.past_quarter.as_ref(),
        }
    }

    pub fn get_mut(&mut self, period: PeriodKey) -> Option<&mut PeriodStats> {
        match period {
            PeriodKey::All => self.all.as_mut(),
            PeriodKey::PastYear => self.past_year.as_mut(),
            PeriodKey::PastQuarter => self.past_quarter.as_mut(),
        }
    }
}

// --- Geo Types ---

/// Flat location descriptor. No field set means "unknown location".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, alias = "stateCode", skip_serializing_if = "Option::is_none")]
    pub domestic_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Location {
    /// The field a filter of the given kind compares against.
    /// Unrecognized kinds have no field.
    pub fn field(&self, kind: &LocationKind) -> Option<&str> {
        match kind {
            LocationKind::Region => self.region.as_deref(),
            LocationKind::Country => self.country_code.as_deref(),
            LocationKind::DomesticRegion => self.domestic_region.as_deref(),
            LocationKind::City => self.city.as_deref(),
            LocationKind::Unrecognized(_) => None,
        }
    }
}

/// Which location field a filter targets.
///
/// Wire names are `region`, `country`, `domesticRegion` and `city`. The
/// legacy spellings `countryCode`, `state` and `stateCode` are accepted.
/// Anything else is kept as `Unrecognized` so matching can fail closed
/// instead of rejecting the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationKind {
    Region,
    Country,
    DomesticRegion,
    City,
    Unrecognized(String),
}

impl LocationKind {
    pub fn as_str(&self) -> &str {
        match self {
            LocationKind::Region => "region",
            LocationKind::Country => "country",
            LocationKind::DomesticRegion => "domesticRegion",
            LocationKind::City => "city",
            LocationKind::Unrecognized(s) => s,
        }
    }
}

impl From<String> for LocationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "region" => LocationKind::Region,
            "country" | "countryCode" => LocationKind::Country,
            "domesticRegion" | "state" | "stateCode" => LocationKind::DomesticRegion,
            "city" => LocationKind::City,
            _ => LocationKind::Unrecognized(s),
        }
    }
}

impl From<&str> for LocationKind {
    fn from(s: &str) -> Self {
        LocationKind::from(s.to_string())
    }
}

impl From<LocationKind> for String {
    fn from(kind: LocationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location predicate. A null type or an empty value selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationFilter {
    #[serde(rename = "type", default)]
    pub kind: Option<LocationKind>,
    #[serde(default)]
    pub value: Option<String>,
}

impl LocationFilter {
    pub fn new(kind: impl Into<LocationKind>, value: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            value: Some(value.into()),
        }
    }

    /// No-filter identity: matches every collective.
    pub fn is_identity(&self) -> bool {
        self.kind.is_none() || self.value.as_deref().map_or(true, str::is_empty)
    }

    /// Parse a JSON-encoded filter, as sent by the dashboard client.
    /// `null` decodes to no filter. Parse failures are fatal.
    pub fn from_json(raw: &str) -> Result<Option<Self>, HorizonsError> {
        serde_json::from_str::<Option<LocationFilter>>(raw)
            .map_err(|e| HorizonsError::InvalidLocationFilter(format!("{e}: {raw}")))
    }
}

/// Explicit grouping of location options for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LocationSection {
    /// The "All locations" sentinel.
    All,
    /// Cities ranked by popularity, rendered above a separator.
    Cities,
    /// Regions with their countries and domestic regions nested below.
    Regions,
}

/// A candidate location filter value with the number of collectives it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOption {
    #[serde(rename = "type")]
    pub kind: Option<LocationKind>,
    pub value: String,
    pub label: String,
    pub count: usize,
    pub section: LocationSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

// --- Categories ---

/// `ALL` is the no-filter sentinel; every other tag is a category tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryTag {
    All,
    Tag(String),
}

impl CategoryTag {
    pub const ALL_STR: &'static str = "ALL";

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryTag::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryTag::All => Self::ALL_STR,
            CategoryTag::Tag(t) => t,
        }
    }
}

impl From<String> for CategoryTag {
    fn from(s: String) -> Self {
        if s == Self::ALL_STR {
            CategoryTag::All
        } else {
            CategoryTag::Tag(s)
        }
    }
}

impl From<&str> for CategoryTag {
    fn from(s: &str) -> Self {
        CategoryTag::from(s.to_string())
    }
}

impl From<CategoryTag> for String {
    fn from(tag: CategoryTag) -> Self {
        match tag {
            CategoryTag::All => CategoryTag::ALL_STR.to_string(),
            CategoryTag::Tag(t) => t,
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, colored grouping of collectives by tag.
///
/// Membership is not stored here; it is derived per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[schemars(with = "String")]
    pub tag: CategoryTag,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    /// Tags that count as this category in addition to `tag`.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub extra_tags: Vec<String>,
}

impl Category {
    pub fn new(label: impl Into<String>, tag: impl Into<CategoryTag>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tag: tag.into(),
            color: color.into(),
            extra_tags: Vec::new(),
        }
    }

    pub fn all(color: impl Into<String>) -> Self {
        Self::new("All", CategoryTag::All, color)
    }
}

// --- Collectives ---

/// A fundraising project hosted by a fiscal sponsor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Collective {
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Curated subset of `tags` used for category membership when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_tags: Option<Vec<String>>,
    /// ISO currency code of the amounts in `stats`. Absent means host currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsByPeriod>,
}

impl Collective {
    pub fn period_stats(&self, period: PeriodKey) -> Option<&PeriodStats> {
        self.stats.as_ref().and_then(|s| s.get(period))
    }

    /// Tags consulted for category membership.
    pub fn membership_tags(&self) -> &[String] {
        self.category_tags.as_deref().unwrap_or(&self.tags)
    }
}

/// The per-host data dump the pipeline runs over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub collectives: Vec<Collective>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn period_time_units_are_fixed() {
        assert_eq!(PeriodKey::All.time_unit(), TimeUnit::Year);
        assert_eq!(PeriodKey::PastYear.time_unit(), TimeUnit::Month);
        assert_eq!(PeriodKey::PastQuarter.time_unit(), TimeUnit::Week);
    }

    #[test]
    fn period_key_round_trips_through_str() {
        for period in PeriodKey::EVERY {
            assert_eq!(period.as_str().parse::<PeriodKey>().unwrap(), period);
        }
        assert!("LAST_WEEK".parse::<PeriodKey>().is_err());
    }

    #[test]
    fn percent_disbursed_is_none_without_raised() {
        assert_eq!(percent_disbursed(100, 0), None);
        assert_eq!(percent_disbursed(200, 1000), Some(20.0));
    }

    #[test]
    fn collective_tolerates_nulls_and_missing_fields() {
        let c: Collective = serde_json::from_value(json!({
            "slug": "a",
            "name": null,
            "tags": null,
            "location": null,
        }))
        .unwrap();
        assert_eq!(c.slug, "a");
        assert!(c.tags.is_empty());
        assert!(c.location.is_none());
        assert!(c.stats.is_none());
        assert!(c.period_stats(PeriodKey::All).is_none());
    }

    #[test]
    fn collective_reads_nested_period_stats() {
        let c: Collective = serde_json::from_value(json!({
            "slug": "a",
            "stats": {
                "ALL": {
                    "raised": 1000,
                    "spent": 200,
                    "contributors": 5,
                    "contributions": 10,
                    "percentDisbursed": 20,
                    "raisedSeries": [{ "date": "2020-01-01", "amount": 1000 }]
                }
            }
        }))
        .unwrap();
        let all = c.period_stats(PeriodKey::All).unwrap();
        assert_eq!(all.raised, 1000);
        assert_eq!(all.raised_series.len(), 1);
        assert!(c.period_stats(PeriodKey::PastYear).is_none());
    }

    #[test]
    fn state_code_is_read_as_domestic_region() {
        let loc: Location =
            serde_json::from_value(json!({ "countryCode": "US", "stateCode": "IL" })).unwrap();
        assert_eq!(loc.domestic_region.as_deref(), Some("IL"));
        assert_eq!(loc.field(&LocationKind::DomesticRegion), Some("IL"));
    }

    #[test]
    fn location_kind_accepts_legacy_names() {
        assert_eq!(LocationKind::from("countryCode"), LocationKind::Country);
        assert_eq!(LocationKind::from("stateCode"), LocationKind::DomesticRegion);
        assert_eq!(
            LocationKind::from("planet"),
            LocationKind::Unrecognized("planet".to_string())
        );
    }

    #[test]
    fn location_filter_json_decoding() {
        assert_eq!(LocationFilter::from_json("null").unwrap(), None);

        let f = LocationFilter::from_json(r#"{"type":"countryCode","value":"FR"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(f.kind, Some(LocationKind::Country));
        assert!(!f.is_identity());

        let empty = LocationFilter::from_json(r#"{"type":null,"value":""}"#)
            .unwrap()
            .unwrap();
        assert!(empty.is_identity());

        assert!(matches!(
            LocationFilter::from_json("{not json"),
            Err(HorizonsError::InvalidLocationFilter(_))
        ));
    }

    #[test]
    fn category_tag_all_sentinel() {
        let c: Category =
            serde_json::from_value(json!({ "label": "All", "tag": "ALL", "color": "#725fed" }))
                .unwrap();
        assert!(c.tag.is_all());
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["tag"], "ALL");
    }
}
