use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Datelike, Utc};
use horizons_common::{HorizonsError, HostConfig, LocationFilter, PeriodKey};
use horizons_pipeline::{compute, window, ComputeInput, ComputeOutput, PeriodWindow};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, warn};

use crate::filter::{parse_path_params, path_for, AppliedFilter, ComputeRequest, DashboardQuery};
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let allowed_origins = &state.file_config.server.allowed_origins;
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/hosts", get(api_hosts))
        .route("/api/compute", post(api_compute))
        .route("/api/dashboard", get(api_dashboard_root))
        .route("/api/dashboard/{*params}", get(api_dashboard))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method and path only; query strings carry filter values.
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn error_response(err: HorizonsError) -> Response {
    let status = match &err {
        HorizonsError::InvalidLocationFilter(_)
        | HorizonsError::UnknownCategory(_)
        | HorizonsError::Validation(_) => StatusCode::BAD_REQUEST,
        HorizonsError::UnknownHost(_) | HorizonsError::SnapshotNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        HorizonsError::CurrencyMismatch { .. }
        | HorizonsError::UnsupportedCurrencyPair { .. }
        | HorizonsError::Config(_)
        | HorizonsError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Rejected request");
    }
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

fn find_host<'a>(state: &'a AppState, slug: Option<&str>) -> Result<&'a HostConfig, HorizonsError> {
    state
        .file_config
        .find_host(slug)
        .ok_or_else(|| HorizonsError::UnknownHost(slug.unwrap_or_default().to_string()))
}

/// Load the host's snapshot and run the pipeline for one filter.
async fn run_compute(
    state: &AppState,
    host: &HostConfig,
    tag: Option<&str>,
    location: Option<&LocationFilter>,
    time_period: PeriodKey,
) -> Result<ComputeOutput, HorizonsError> {
    let snapshot = state.store.get(host, Utc::now().year()).await?;
    compute(&ComputeInput {
        tag,
        location,
        time_period,
        categories: &snapshot.categories,
        all_collectives: &snapshot.collectives,
        policy: &snapshot.policy,
        countries: &state.countries,
    })
}

// --- /api/hosts ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HostSummary<'a> {
    name: &'a str,
    slug: &'a str,
    root: bool,
    /// Hosts the root dashboard aggregates.
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    host_slugs: &'a [String],
    currency: &'a str,
    start_year: i32,
    color: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<&'a str>,
    path: String,
}

impl<'a> HostSummary<'a> {
    fn new(host: &'a HostConfig) -> Self {
        let root = host.root || host.slug.is_empty();
        Self {
            name: &host.name,
            slug: &host.slug,
            root,
            host_slugs: &host.host_slugs,
            currency: &host.currency,
            start_year: host.start_year,
            color: &host.color,
            website: host.website.as_deref(),
            path: path_for((!root).then_some(host.slug.as_str()), PeriodKey::All),
        }
    }
}

async fn api_hosts(State(state): State<Arc<AppState>>) -> Response {
    let hosts: Vec<HostSummary<'_>> = state
        .file_config
        .hosts
        .iter()
        .map(HostSummary::new)
        .collect();
    Json(hosts).into_response()
}

// --- /api/compute ---

#[derive(Serialize)]
struct ComputeResponse {
    collectives: Vec<horizons_pipeline::CollectiveSummary>,
    stats: horizons_pipeline::AggregateStats,
    series: Vec<horizons_pipeline::CategorySeries>,
}

/// The body is read as text and parsed here so clients that post JSON
/// without a JSON content type are still served.
async fn api_compute(State(state): State<Arc<AppState>>, body: String) -> Response {
    let request: ComputeRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("Invalid request body: {e}")})),
            )
                .into_response();
        }
    };

    // A request without a usable period only warms the handler.
    let Some(time_period) = request.period() else {
        return Json(serde_json::json!({})).into_response();
    };

    let location = match request.location_filter() {
        Ok(location) => location,
        Err(e) => return error_response(e),
    };
    let host = match find_host(&state, request.host_slug()) {
        Ok(host) => host,
        Err(e) => return error_response(e),
    };

    match run_compute(
        &state,
        host,
        request.tag.as_deref(),
        location.as_ref(),
        time_period,
    )
    .await
    {
        Ok(output) => Json(ComputeResponse {
            collectives: output.collectives,
            stats: output.stats,
            series: output.series,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

// --- /api/dashboard ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardPage<'a> {
    host: HostSummary<'a>,
    filter: AppliedFilter,
    path: String,
    window: PeriodWindow,
    #[serde(flatten)]
    data: ComputeOutput,
}

async fn api_dashboard_root(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    dashboard(&state, "", &query).await
}

async fn api_dashboard(
    State(state): State<Arc<AppState>>,
    Path(params): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    dashboard(&state, &params, &query).await
}

async fn dashboard(state: &AppState, params: &str, query: &DashboardQuery) -> Response {
    let route = parse_path_params(params);
    let host = match find_host(state, route.host_slug.as_deref()) {
        Ok(host) => host,
        Err(e) => return error_response(e),
    };
    let period_window = match window(route.time_period, Utc::now(), host.start_year) {
        Ok(w) => w,
        Err(e) => return error_response(e),
    };
    let location = query.location_filter();

    match run_compute(
        state,
        host,
        query.tag(),
        location.as_ref(),
        route.time_period,
    )
    .await
    {
        Ok(data) => {
            let filter = AppliedFilter {
                slug: route.host_slug.clone(),
                tag: query.tag().unwrap_or("ALL").to_string(),
                time_period: route.time_period,
                location,
            };
            Json(DashboardPage {
                host: HostSummary::new(host),
                path: path_for(route.host_slug.as_deref(), route.time_period),
                filter,
                window: period_window,
                data,
            })
            .into_response()
        }
        Err(e) => error_response(e),
    }
}
