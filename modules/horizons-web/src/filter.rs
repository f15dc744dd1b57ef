//! Decoding dashboard filters from routes, query strings and request bodies.
//!
//! Routes are `/{host_slug?}/{time_period?}`. A first segment that names a
//! period selects the root host; a missing or unknown period means `ALL`.
//! The location filter comes from the `location` and `locationType` query
//! parameters, and only when both are present.

use horizons_common::{
    file_config::ROOT_DUMP_KEY, HorizonsError, LocationFilter, LocationKind, PeriodKey,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub host_slug: Option<String>,
    pub time_period: PeriodKey,
}

pub fn parse_path_params(path: &str) -> RouteParams {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => RouteParams {
            host_slug: None,
            time_period: PeriodKey::All,
        },
        [first, rest @ ..] => match first.parse::<PeriodKey>() {
            Ok(period) => RouteParams {
                host_slug: None,
                time_period: period,
            },
            Err(_) => RouteParams {
                host_slug: Some(first.to_string()),
                time_period: rest
                    .first()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(PeriodKey::All),
            },
        },
    }
}

/// Inverse of [`parse_path_params`]: `ALL` and the root host are left out.
pub fn path_for(host_slug: Option<&str>, time_period: PeriodKey) -> String {
    let host = host_slug.filter(|s| !s.is_empty());
    let period = (time_period != PeriodKey::All).then(|| time_period.as_str());
    let parts: Vec<&str> = host.into_iter().chain(period).collect();
    format!("/{}", parts.join("/"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
}

impl DashboardQuery {
    pub fn location_filter(&self) -> Option<LocationFilter> {
        let value = self.location.as_deref().filter(|s| !s.is_empty())?;
        let kind = self.location_type.as_deref().filter(|s| !s.is_empty())?;
        Some(LocationFilter::new(LocationKind::from(kind), value))
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|s| !s.is_empty())
    }
}

/// The location of a compute request: either the JSON-encoded string the
/// dashboard client sends, or the filter object itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationParam {
    Encoded(String),
    Filter(LocationFilter),
}

impl LocationParam {
    pub fn decode(&self) -> Result<Option<LocationFilter>, HorizonsError> {
        match self {
            LocationParam::Encoded(raw) => LocationFilter::from_json(raw),
            LocationParam::Filter(filter) => Ok(Some(filter.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Kept raw so an unknown period can be answered with an empty payload.
    #[serde(default)]
    pub time_period: Option<String>,
    #[serde(default)]
    pub location: Option<LocationParam>,
}

impl ComputeRequest {
    pub fn period(&self) -> Option<PeriodKey> {
        self.time_period.as_deref().and_then(|p| p.parse().ok())
    }

    /// Host slug with the root dump key folded into "no slug".
    pub fn host_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty() && *s != ROOT_DUMP_KEY)
    }

    pub fn location_filter(&self) -> Result<Option<LocationFilter>, HorizonsError> {
        match &self.location {
            Some(param) => param.decode(),
            None => Ok(None),
        }
    }
}

/// The filter a dashboard response was computed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilter {
    pub slug: Option<String>,
    pub tag: String,
    pub time_period: PeriodKey,
    pub location: Option<LocationFilter>,
}
