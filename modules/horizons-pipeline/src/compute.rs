//! The compute entry point: one filter in, one dashboard payload out.
//!
//! Steps:
//! 1. Location-filter the collectives.
//! 2. Partition the filtered set into categories (`ALL` first).
//! 3. Select the current category from `tag`; `None` or `ALL` selects `ALL`.
//! 4. Aggregate stats over the current category for the period.
//! 5. Build time series for every category when the current one is `ALL`,
//!    otherwise for the current category only.
//! 6. Flatten each current-category collective's period stats.
//!
//! Location options are built from the unfiltered collectives so every
//! location stays selectable.

use chrono::{DateTime, Utc};
use horizons_common::{
    Category, CategoryTag, Collective, CountryTable, HorizonsError, Location, LocationFilter,
    LocationOption, PeriodKey,
};
use serde::{Deserialize, Serialize};

use crate::categories::{normalize_tag, partition, CategoryMembers, TagPolicy};
use crate::location::filter_location;
use crate::location_options::get_filter_options;
use crate::series::{compute_time_series, CategorySeries};
use crate::stats::{compute_stats, AggregateStats};

#[derive(Debug, Clone, Copy)]
pub struct ComputeInput<'a> {
    pub tag: Option<&'a str>,
    pub location: Option<&'a LocationFilter>,
    pub time_period: PeriodKey,
    pub categories: &'a [Category],
    pub all_collectives: &'a [Collective],
    pub policy: &'a TagPolicy,
    pub countries: &'a CountryTable,
}

/// A collective with its stats for one period lifted to the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveSummary {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub contributors: u64,
    pub raised: i64,
    pub spent: i64,
    pub percent_disbursed: Option<f64>,
}

impl CollectiveSummary {
    pub fn from_collective(c: &Collective, period: PeriodKey) -> Self {
        let stats = c.period_stats(period);
        Self {
            slug: c.slug.clone(),
            name: c.name.clone(),
            image_url: c.image_url.clone(),
            description: c.description.clone(),
            created_at: c.created_at,
            tags: c.tags.clone(),
            location: c.location.clone(),
            contributors: stats.map_or(0, |s| s.contributors),
            raised: stats.map_or(0, |s| s.raised),
            spent: stats.map_or(0, |s| s.spent),
            percent_disbursed: stats.and_then(|s| s.percent_disbursed()),
        }
    }
}

/// A category and how many filtered collectives it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub label: String,
    pub tag: CategoryTag,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeOutput {
    pub collectives: Vec<CollectiveSummary>,
    pub stats: AggregateStats,
    pub series: Vec<CategorySeries>,
    pub categories: Vec<CategorySummary>,
    pub location_options: Vec<LocationOption>,
}

fn is_all(tag: Option<&str>) -> bool {
    tag.map_or(true, |t| t.is_empty() || t == CategoryTag::ALL_STR)
}

fn find_current<'m, 'a>(
    members: &'m [CategoryMembers<'a>],
    tag: Option<&str>,
) -> Result<&'m CategoryMembers<'a>, HorizonsError> {
    let found = if is_all(tag) {
        members.iter().find(|m| m.category.tag.is_all())
    } else {
        let wanted = normalize_tag(tag.unwrap_or_default());
        members.iter().find(|m| match &m.category.tag {
            CategoryTag::All => false,
            CategoryTag::Tag(t) => normalize_tag(t) == wanted,
        })
    };
    found.ok_or_else(|| HorizonsError::UnknownCategory(tag.unwrap_or_default().to_string()))
}

pub fn compute(input: &ComputeInput<'_>) -> Result<ComputeOutput, HorizonsError> {
    let period = input.time_period;

    let filtered = filter_location(input.all_collectives, input.location);
    let members = partition(&filtered, input.categories, input.policy);
    let current = find_current(&members, input.tag)?;

    let stats = compute_stats(current.collectives.iter().copied(), period);

    let series = if current.category.tag.is_all() {
        compute_time_series(&members, period)
    } else {
        compute_time_series(std::slice::from_ref(current), period)
    };

    let collectives = current
        .collectives
        .iter()
        .map(|c| CollectiveSummary::from_collective(c, period))
        .collect();

    let categories = members
        .iter()
        .map(|m| CategorySummary {
            label: m.category.label.clone(),
            tag: m.category.tag.clone(),
            color: m.category.color.clone(),
            count: m.count(),
        })
        .collect();

    let location_options = get_filter_options(input.all_collectives, input.countries);

    tracing::debug!(
        period = %period,
        tag = current.category.tag.as_str(),
        filtered = filtered.len(),
        collectives = current.count(),
        raised = stats.raised,
        "Computed dashboard data"
    );

    Ok(ComputeOutput {
        collectives,
        stats,
        series,
        categories,
        location_options,
    })
}
