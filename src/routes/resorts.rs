//! Resort HTTP endpoints.
//!
//! - GET /api/v1/resorts?ids=niseko-united,furano-ski-resort
//! - GET /api/v1/resorts/catalog

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::models::{MapCoords, Resort, ResortInfo};
use crate::services::report::SnowReportService;

/// Response header set when every entry is offline placeholder data.
pub const OFFLINE_HEADER: &str = "X-Snow-Offline";

/// Shared application state for resort endpoints.
#[derive(Clone)]
pub struct AppState {
    pub report_service: SnowReportService,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResortsQuery {
    /// Comma-separated resort ids. All resorts when omitted.
    pub ids: Option<String>,
}

/// Live snow report for the requested resorts.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResortsResponse {
    /// When this report was assembled (ISO 8601)
    pub fetched_at: String,
    /// True when the upstream batch failed and every entry is a placeholder
    pub offline: bool,
    /// One entry per requested id, in request order
    pub resorts: Vec<ResortInfo>,
}

/// Static catalog entry (no forecast data).
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub localized_name: String,
    pub coords: MapCoords,
}

impl From<Resort> for CatalogEntry {
    fn from(r: Resort) -> Self {
        Self {
            id: r.id(),
            name: r.display_name().to_string(),
            localized_name: r.localized_name().to_string(),
            coords: r.coords(),
        }
    }
}

/// Resolve the `ids` query parameter. Duplicates are kept; order is preserved.
pub fn parse_ids(ids: Option<&str>) -> Result<Vec<Resort>, AppError> {
    let ids: Vec<&str> = ids
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if ids.is_empty() {
        return Ok(Resort::ALL.to_vec());
    }

    ids.into_iter()
        .map(|id| id.parse::<Resort>().map_err(AppError::BadRequest))
        .collect()
}

/// Get the live snow report.
///
/// Makes two batched model calls covering every requested resort. If either
/// fails, all entries are offline placeholders and `X-Snow-Offline: true`
/// is set.
#[utoipa::path(
    get,
    path = "/api/v1/resorts",
    tag = "Resorts",
    params(ResortsQuery),
    responses(
        (status = 200, description = "Snow report per requested resort", body = ResortsResponse,
         headers(
             ("X-Snow-Offline" = String, description = "Set to 'true' when the upstream batch failed")
         )),
        (status = 400, description = "Unknown resort id", body = ErrorResponse),
    )
)]
pub async fn get_resorts(
    State(state): State<AppState>,
    Query(params): Query<ResortsQuery>,
) -> Result<(HeaderMap, Json<ResortsResponse>), AppError> {
    let requested = parse_ids(params.ids.as_deref())?;

    let resorts = state
        .report_service
        .fetch_all_resorts_data(&requested)
        .await;
    let offline = !resorts.is_empty() && resorts.iter().all(|r| r.provenance.is_offline());

    let mut headers = HeaderMap::new();
    if offline {
        headers.insert(OFFLINE_HEADER, HeaderValue::from_static("true"));
    }

    Ok((
        headers,
        Json(ResortsResponse {
            fetched_at: Utc::now().to_rfc3339(),
            offline,
            resorts,
        }),
    ))
}

/// List the tracked resorts with map coordinates. No upstream calls.
#[utoipa::path(
    get,
    path = "/api/v1/resorts/catalog",
    tag = "Resorts",
    responses(
        (status = 200, description = "All tracked resorts", body = Vec<CatalogEntry>),
    )
)]
pub async fn get_catalog() -> Json<Vec<CatalogEntry>> {
    Json(Resort::ALL.into_iter().map(CatalogEntry::from).collect())
}
