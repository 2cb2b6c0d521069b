//! REST handlers for the discovery endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use fieldscout_common::{DiscoveryCriteria, SourceId, Sport};
use fieldscout_discovery::{
    DiscoveryEngine, DiscoveryReport, DiscoveryRequest, EngineError, RunStats,
};

use crate::AppState;

/// Cap applied when a request does not name one.
const DEFAULT_MAX_RESULTS: usize = 50;

/// Body of `POST /discover`. Every field is optional; an empty object
/// runs the default sources with no filters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoverBody {
    sources: Vec<String>,
    sport: Option<String>,
    state: Option<String>,
    graduation_year: Option<u16>,
    position: Option<String>,
    min_quality_score: Option<u8>,
    max_results: Option<usize>,
    use_apis: Option<bool>,
    region: Option<String>,
    api_keys: HashMap<String, String>,
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DiscoverBody>,
) -> impl IntoResponse {
    let mut sources = Vec::new();
    for raw in &body.sources {
        match SourceId::parse(raw) {
            Some(id) => sources.push(id),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("unknown source: '{raw}'")})),
                )
                    .into_response();
            }
        }
    }

    let criteria = DiscoveryCriteria::builder()
        .sport(Some(Sport::from_str_loose(
            body.sport.as_deref().unwrap_or("basketball"),
        )))
        .state(body.state)
        .graduation_year(body.graduation_year)
        .position(body.position)
        .min_quality_score(body.min_quality_score)
        .max_results(body.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
        .build();
    let request = DiscoveryRequest {
        sources,
        criteria,
        region: body.region.unwrap_or_else(|| "US".to_string()),
        use_apis: body.use_apis.unwrap_or(true),
        api_keys: body.api_keys,
    };
    let sources_searched = state.engine.resolve_sources(&request).len();

    match state.engine.discover(&request).await {
        Ok(report) => {
            info!(
                profiles = report.profiles.len(),
                errors = report.errors.len(),
                "Discovery request served"
            );
            Json(envelope(&state.engine, &request, sources_searched, &report)).into_response()
        }
        // Upstreams failing is not a server fault; the envelope carries
        // the outcome and the status stays 200.
        Err(EngineError::AllSourcesFailed { errors }) => {
            warn!(failed = errors.len(), "Every discovery source failed");
            let report = DiscoveryReport {
                profiles: Vec::new(),
                stats: RunStats {
                    errors: errors.len() as u32,
                    ..RunStats::default()
                },
                errors,
            };
            Json(envelope(&state.engine, &request, sources_searched, &report)).into_response()
        }
    }
}

pub async fn discover_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "services": {
            "fetcher": "operational",
            "apis": state.engine.quota().availability(),
        },
        "timestamp": Utc::now(),
    }))
}

fn envelope(
    engine: &DiscoveryEngine,
    request: &DiscoveryRequest,
    sources_searched: usize,
    report: &DiscoveryReport,
) -> serde_json::Value {
    let mut value = serde_json::json!({
        "success": !report.profiles.is_empty(),
        "data": report.profiles,
        "analytics": {
            "bySource": report.stats.records_by_source,
            "bySport": report.stats.profiles_by_sport,
            "averageConfidence": report.stats.average_confidence,
            "highQualityCount": report.stats.high_quality,
            "errorCount": report.stats.errors,
            "errorSample": report.errors.first(),
        },
        "metadata": {
            "sourcesSearched": sources_searched,
            "sport": request.criteria.sport.map(|s| s.to_string()),
            "region": request.region,
            "timestamp": Utc::now(),
            "apis": engine.quota().availability(),
        },
    });
    // The key is absent, not an empty array, on a clean run.
    if !report.errors.is_empty() {
        value["errors"] = serde_json::json!(report.errors);
    }
    value
}
