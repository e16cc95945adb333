use utoipa::OpenApi;
use crate::controllers::analysis_controller;
use crate::models::{api, finance, wind};

#[derive(OpenApi)]
#[openapi(
    paths(
        analysis_controller::list_turbines,
        analysis_controller::get_turbine,
        analysis_controller::analyze_location,
        analysis_controller::analyze_series,
        analysis_controller::series_averages,
        analysis_controller::compute_financials,
        analysis_controller::health
    ),
    components(
        schemas(
            wind::CurvePoint,
            wind::TurbineSpec,
            wind::WeatherSeries,
            wind::LossFactors,
            wind::AepResult,
            wind::WindRose,
            wind::WindRoseSector,
            wind::DominantDirection,
            wind::AveragingPeriod,
            wind::PeriodAverage,
            wind::SiteMetrics,
            finance::Bounded,
            finance::RiskLevel,
            finance::Recommendation,
            finance::YearlyCashFlow,
            finance::FinancialResult,
            finance::PriceSource,
            finance::PriceQuote,
            api::EconomicInputs,
            api::LocationAnalysisRequest,
            api::SeriesAnalysisRequest,
            api::FinancialRequest,
            api::AveragesRequest,
            api::AnalysisWindow,
            api::Location,
            api::AnalysisReport,
            api::HealthStatus
        )
    ),
    tags(
        (name = "wind-yield-sim", description = "Wind energy yield and investment analysis API")
    )
)]
pub struct ApiDoc;
