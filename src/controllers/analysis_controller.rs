use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::api::{
    AnalysisReport, AveragesRequest, FinancialRequest, HealthStatus, Location, LocationAnalysisRequest, SeriesAnalysisRequest,
};
use crate::models::finance::FinancialResult;
use crate::models::wind::{PeriodAverage, TurbineSpec};
use crate::services::{analysis, turbines, weather_service};
use crate::shared_state::AppState;

/// GET /api/turbines
/// List the turbine catalog
///
/// Every selectable model with its rated power, hub height and full power curve.
#[utoipa::path(
    get,
    path = "/api/turbines",
    responses(
        (status = 200, description = "Turbine catalog", body = Vec<TurbineSpec>)
    )
)]
pub async fn list_turbines() -> Json<Vec<TurbineSpec>> {
    Json(turbines::CATALOG.iter().map(TurbineSpec::from).collect())
}

/// GET /api/turbines/{key}
#[utoipa::path(
    get,
    path = "/api/turbines/{key}",
    params(
        ("key" = String, Path, description = "Catalog key, e.g. vestas_v150")
    ),
    responses(
        (status = 200, description = "Turbine specification", body = TurbineSpec),
        (status = 404, description = "Unknown turbine")
    )
)]
pub async fn get_turbine(Path(key): Path<String>) -> Result<Json<TurbineSpec>, AnalysisError> {
    turbines::find_turbine(&key).map(|t| Json(TurbineSpec::from(t)))
}

/// POST /api/analysis
/// Analyze a geographic point
///
/// Fetches the hourly archive for the configured look-back window (served from
/// cache when fresh), then runs the full yield and investment analysis.
#[utoipa::path(
    post,
    path = "/api/analysis",
    request_body = LocationAnalysisRequest,
    responses(
        (status = 200, description = "Yield and investment report", body = AnalysisReport),
        (status = 400, description = "Invalid coordinates or parameters"),
        (status = 404, description = "Unknown turbine"),
        (status = 422, description = "Archive returned no usable wind data"),
        (status = 502, description = "Weather archive unavailable")
    )
)]
pub async fn analyze_location(
    State(state): State<AppState>,
    State(config): State<Config>,
    Json(req): Json<LocationAnalysisRequest>,
) -> Result<Json<AnalysisReport>, AnalysisError> {
    let turbine = turbines::find_turbine(&req.turbine)?;
    info!(lat = req.latitude, lon = req.longitude, turbine = turbine.key, "location analysis requested");

    let (series, window) =
        weather_service::fetch_hourly_series(&state, &config.weather, req.latitude, req.longitude).await?;
    let location = Location { latitude: req.latitude, longitude: req.longitude };

    analysis::analyze_location(
        &config,
        &series,
        window,
        location,
        turbine,
        &req.economics,
        req.country_code.as_deref(),
    )
    .map(Json)
}

/// POST /api/analysis/series
/// Analyze a caller-supplied hourly series
///
/// Same pipeline as `/api/analysis` without any network access.
#[utoipa::path(
    post,
    path = "/api/analysis/series",
    request_body = SeriesAnalysisRequest,
    responses(
        (status = 200, description = "Yield and investment report", body = AnalysisReport),
        (status = 400, description = "Malformed series or parameters"),
        (status = 404, description = "Unknown turbine"),
        (status = 422, description = "No usable wind data")
    )
)]
pub async fn analyze_series(
    State(config): State<Config>,
    Json(req): Json<SeriesAnalysisRequest>,
) -> Result<Json<AnalysisReport>, AnalysisError> {
    let turbine = turbines::find_turbine(&req.turbine)?;
    analysis::analyze_series(&config, &req.series, turbine, &req.economics, req.country_code.as_deref()).map(Json)
}

/// POST /api/financials
/// Recompute the investment model for a known net AEP
///
/// Lets a client re-run the economics after a parameter change without
/// re-processing the weather series.
#[utoipa::path(
    post,
    path = "/api/financials",
    request_body = FinancialRequest,
    responses(
        (status = 200, description = "Financial metrics", body = FinancialResult),
        (status = 400, description = "Invalid economic parameters"),
        (status = 404, description = "Unknown turbine")
    )
)]
pub async fn compute_financials(
    State(config): State<Config>,
    Json(req): Json<FinancialRequest>,
) -> Result<Json<FinancialResult>, AnalysisError> {
    let turbine = turbines::find_turbine(&req.turbine)?;
    let (result, _price) =
        analysis::evaluate_financials(&config, &req.economics, req.country_code.as_deref(), turbine, req.net_aep_mwh)?;
    Ok(Json(result))
}

/// POST /api/analysis/averages
/// Hourly, daily, monthly or yearly averages of a measured series
#[utoipa::path(
    post,
    path = "/api/analysis/averages",
    request_body = AveragesRequest,
    responses(
        (status = 200, description = "Chronological period averages", body = Vec<PeriodAverage>),
        (status = 400, description = "Malformed series"),
        (status = 422, description = "No usable wind data")
    )
)]
pub async fn series_averages(Json(req): Json<AveragesRequest>) -> Result<Json<Vec<PeriodAverage>>, AnalysisError> {
    analysis::series_averages(&req.series, req.period).map(Json)
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        turbines: turbines::CATALOG.len(),
        cached_series: state.cache_len(),
    })
}
