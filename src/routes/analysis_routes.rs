use axum::{routing::{get, post}, Router};
use crate::controllers::analysis_controller::{
    // Catalog
    list_turbines, get_turbine,
    // Analysis
    analyze_location, analyze_series, series_averages, compute_financials,
    // Service
    health,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>`.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/turbines",         get(list_turbines))
        .route("/turbines/{key}",   get(get_turbine))
        .route("/analysis",         post(analyze_location))
        .route("/analysis/series",  post(analyze_series))
        .route("/analysis/averages", post(series_averages))
        .route("/financials",       post(compute_financials))
        .route("/health",           get(health))
        .with_state(shared)
}
