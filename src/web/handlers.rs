//! HTTP request handlers

use super::state::AppState;
use crate::error::SearchError;
use crate::results::CanonicalPoi;
use crate::routing::{parse_waypoint, EvRouteQuery, ReachableRangeQuery};
use crate::search::{
    category_names, ChargerType, Location, PoiSearch, SearchArea, StationSearch,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of a charging-station search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSearchBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters
    pub radius: Option<f64>,
    pub limit: Option<u32>,
    /// `fast`, `level2`, anything else means all chargers
    pub charger_type: Option<String>,
}

/// Body of a categorized POI search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiSearchBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters
    pub radius: Option<f64>,
    pub limit: Option<u32>,
    pub categories: Option<Vec<String>>,
}

/// Body of a reachable-range calculation
#[derive(Debug, Deserialize)]
pub struct ReachableRangeBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "energyBudgetInkWh")]
    pub energy_budget_kwh: Option<f64>,
    #[serde(rename = "routeType")]
    pub route_type: Option<String>,
    #[serde(rename = "constantSpeedConsumptionInkWhPerHundredkm")]
    pub consumption_curve: Option<String>,
}

/// Body of an EV route calculation; waypoints are `lat,lon` strings
#[derive(Debug, Deserialize)]
pub struct EvRouteBody {
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "currentChargeInkWh")]
    pub current_charge_kwh: Option<f64>,
    #[serde(rename = "maxChargeInkWh")]
    pub max_charge_kwh: Option<f64>,
    #[serde(rename = "auxiliaryPowerInkW")]
    pub auxiliary_power_kw: Option<f64>,
    #[serde(rename = "constantSpeedConsumptionInkWhPerHundredkm")]
    pub consumption_curve: Option<String>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub source: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsData {
    pub stations: Vec<CanonicalPoi>,
    pub total_results: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoisData {
    pub pois: Vec<CanonicalPoi>,
    pub total_results: usize,
}

/// Error envelope for search failures
#[derive(Debug)]
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self.0 {
            SearchError::MissingCredentials { provider } => {
                tracing::error!("{}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.0.to_string(),
                    format!("{}_API_KEY environment variable is required", provider.to_uppercase()),
                )
            }
            SearchError::MissingParameter(_)
            | SearchError::InvalidLocation { .. }
            | SearchError::InvalidRadius(_)
            | SearchError::InvalidParameter { .. } => (
                StatusCode::BAD_REQUEST,
                "Missing required parameters".to_string(),
                self.0.to_string(),
            ),
            SearchError::TooManyCategories { .. } => (
                StatusCode::BAD_REQUEST,
                "Too many categories".to_string(),
                self.0.to_string(),
            ),
            // forward the provider's own status and body
            SearchError::ProviderStatus {
                provider,
                status,
                body,
            } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                format!("{} API error", provider),
                body.clone(),
            ),
            SearchError::ProviderUnavailable { operation, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                format!("Failed to calculate {}", operation),
            ),
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}

fn search_area(
    state: &AppState,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
    limit: Option<u32>,
) -> Result<SearchArea, SearchError> {
    let (Some(lat), Some(lon)) = (latitude, longitude) else {
        return Err(SearchError::MissingParameter("latitude and longitude"));
    };
    let defaults = &state.settings.search;
    SearchArea::new(
        lat,
        lon,
        radius.unwrap_or(defaults.default_radius),
        limit.unwrap_or(defaults.default_limit),
    )
}

fn envelope<T>(state: &AppState, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
        source: state.aggregator.provider().name().to_string(),
    })
}

/// Charging-station search handler
pub async fn charging_stations(
    State(state): State<AppState>,
    Json(body): Json<StationSearchBody>,
) -> Result<Json<ApiResponse<StationsData>>, ApiError> {
    state.aggregator.ensure_configured()?;
    let search = StationSearch {
        area: search_area(&state, body.latitude, body.longitude, body.radius, body.limit)?,
        charger_type: ChargerType::from_param(body.charger_type.as_deref()),
    };

    let response = state.aggregator.search_stations(&search).await?;

    Ok(envelope(
        &state,
        StationsData {
            total_results: response.total_results,
            stations: response.results,
        },
    ))
}

/// Categorized POI search handler
pub async fn pois(
    State(state): State<AppState>,
    Json(body): Json<PoiSearchBody>,
) -> Result<Json<ApiResponse<PoisData>>, ApiError> {
    state.aggregator.ensure_configured()?;
    let search = PoiSearch {
        area: search_area(&state, body.latitude, body.longitude, body.radius, body.limit)?,
        categories: body
            .categories
            .unwrap_or_else(|| state.settings.search.default_categories.clone()),
    };

    let response = state.aggregator.search_pois(&search).await?;

    Ok(envelope(
        &state,
        PoisData {
            total_results: response.total_results,
            pois: response.results,
        },
    ))
}

/// Reachable-range handler
pub async fn reachable_range(
    State(state): State<AppState>,
    Json(body): Json<ReachableRangeBody>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.routing.ensure_configured()?;
    let (Some(lat), Some(lon), Some(budget)) = (body.latitude, body.longitude, body.energy_budget_kwh)
    else {
        return Err(SearchError::MissingParameter("latitude, longitude, and energyBudgetInkWh").into());
    };

    let query = ReachableRangeQuery::new(Location::new(lat, lon)?, budget)?
        .with_route_type(body.route_type)
        .with_consumption_curve(body.consumption_curve)?;

    let data = state.routing.reachable_range(&query).await?;
    Ok(envelope(&state, data))
}

/// EV route handler
pub async fn ev_route(
    State(state): State<AppState>,
    Json(body): Json<EvRouteBody>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    state.routing.ensure_configured()?;
    let (Some(origin), Some(destination), Some(current), Some(max)) = (
        body.origin.as_deref(),
        body.destination.as_deref(),
        body.current_charge_kwh,
        body.max_charge_kwh,
    ) else {
        return Err(SearchError::MissingParameter(
            "origin, destination, currentChargeInkWh, and maxChargeInkWh",
        )
        .into());
    };

    let query = EvRouteQuery::new(
        parse_waypoint("origin", origin)?,
        parse_waypoint("destination", destination)?,
        current,
        max,
    )?
    .with_auxiliary_power(body.auxiliary_power_kw)?
    .with_consumption_curve(body.consumption_curve)?;

    let data = state.routing.ev_route(&query).await?;
    Ok(envelope(&state, data))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let provider = state.aggregator.provider();
    let configured = provider.is_configured();

    let status_text = if configured { "ok" } else { "unhealthy" };
    let body = json!({
        "status": status_text,
        "version": crate::VERSION,
        "instance": state.instance_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": state.started_at.elapsed().as_secs(),
        "provider": {
            "name": provider.name(),
            "configured": configured,
        },
        "categories": category_names(),
    });

    let status = if configured {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

/// Sub-query statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
