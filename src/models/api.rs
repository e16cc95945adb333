use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::finance::{FinancialResult, PriceQuote};
use crate::models::wind::{AepResult, AveragingPeriod, PeriodAverage, SiteMetrics, TurbineSpec, WeatherSeries, WindRose};

// ─── Requests ────────────────────────────────────────────────────────────────

/// Economic inputs; anything left out falls back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EconomicInputs {
    pub capex_per_kw: Option<f64>,
    pub opex_per_mw: Option<f64>,
    /// Overrides country/default price resolution ($/kWh)
    pub electricity_price_per_kwh: Option<f64>,
    pub lifetime_years: Option<u32>,
    pub discount_rate: Option<f64>,
    pub degradation_rate: Option<f64>,
    pub inflation_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationAnalysisRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub turbine: String,
    /// ISO 3166 alpha-2, resolved by the caller
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub economics: EconomicInputs,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SeriesAnalysisRequest {
    pub series: WeatherSeries,
    pub turbine: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub economics: EconomicInputs,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FinancialRequest {
    pub net_aep_mwh: f64,
    pub turbine: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub economics: EconomicInputs,
}

/// Period averages of the measured (low-height) wind column.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AveragesRequest {
    pub series: WeatherSeries,
    pub period: AveragingPeriod,
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisReport {
    pub location: Option<Location>,
    pub window: Option<AnalysisWindow>,
    pub turbine: TurbineSpec,
    pub data_points: usize,
    pub site: SiteMetrics,
    pub aep: AepResult,
    pub price: PriceQuote,
    pub financials: FinancialResult,
    pub wind_rose: WindRose,
    pub monthly_averages: Vec<PeriodAverage>,
    pub yearly_averages: Vec<PeriodAverage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub turbines: usize,
    pub cached_series: usize,
}
