use tracing::info;

use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::api::{AnalysisReport, AnalysisWindow, EconomicInputs, Location};
use crate::models::finance::{FinancialParams, FinancialResult, PriceQuote};
use crate::models::wind::{AveragingPeriod, PeriodAverage, Turbine, TurbineSpec, WeatherSeries};
use crate::services::{aep, financial, gap_fill, period_averages, pricing, wind_rose};

/// Request economics merged over the configured defaults, plus the resolved price.
pub fn financial_params(
    cfg: &Config,
    inputs: &EconomicInputs,
    country_code: Option<&str>,
    turbine: &Turbine,
    net_aep_mwh: f64,
) -> (FinancialParams, PriceQuote) {
    let d = &cfg.economics;
    let price = pricing::resolve_price(&cfg.pricing, inputs.electricity_price_per_kwh, country_code);
    let params = FinancialParams {
        net_aep_mwh,
        electricity_price: price.price_per_kwh,
        capex_per_kw: inputs.capex_per_kw.unwrap_or(d.capex_per_kw),
        opex_per_mw: inputs.opex_per_mw.unwrap_or(d.opex_per_mw),
        rated_power_kw: turbine.rated_power_kw,
        lifetime_years: inputs.lifetime_years.unwrap_or(d.lifetime_years),
        discount_rate: inputs.discount_rate.unwrap_or(d.discount_rate),
        degradation_rate: inputs.degradation_rate.unwrap_or(d.degradation_rate),
        inflation_rate: inputs.inflation_rate.unwrap_or(d.inflation_rate),
    };
    (params, price)
}

pub fn evaluate_financials(
    cfg: &Config,
    inputs: &EconomicInputs,
    country_code: Option<&str>,
    turbine: &Turbine,
    net_aep_mwh: f64,
) -> Result<(FinancialResult, PriceQuote), AnalysisError> {
    let (params, price) = financial_params(cfg, inputs, country_code, turbine, net_aep_mwh);
    Ok((financial::calculate_financials(&params)?, price))
}

/// Full pipeline: validate → gap-fill → hub-height processing → AEP →
/// financials, with the wind rose and period averages alongside.
pub fn analyze_series(
    cfg: &Config,
    series: &WeatherSeries,
    turbine: &Turbine,
    inputs: &EconomicInputs,
    country_code: Option<&str>,
) -> Result<AnalysisReport, AnalysisError> {
    series.validate()?;

    let filled = gap_fill::fill_series(series);
    let samples = filled.samples();
    let hours = aep::process_hours(&samples, filled.low_height_m, filled.high_height_m, turbine)?;

    let aep_result = aep::calculate_aep(&hours, turbine, &cfg.losses)?;
    let (financials, price) = evaluate_financials(cfg, inputs, country_code, turbine, aep_result.net_aep_mwh)?;

    let rose = wind_rose::calculate_wind_rose(
        hours.iter().map(|h| (h.direction_deg, Some(h.wind_speed_hub_ms))),
    );

    let rows = || {
        samples
            .iter()
            .zip(&hours)
            .map(|(s, h)| (s.timestamp.as_str(), Some(h.wind_speed_hub_ms), h.direction_deg))
    };
    let monthly_averages = period_averages::period_averages(rows(), AveragingPeriod::Month);
    let yearly_averages = period_averages::period_averages(rows(), AveragingPeriod::Year);

    info!(
        turbine = turbine.key,
        rows = hours.len(),
        net_aep_mwh = aep_result.net_aep_mwh,
        capacity_factor = aep_result.capacity_factor,
        npv = financials.npv,
        recommendation = ?financials.recommendation,
        "analysis complete"
    );

    Ok(AnalysisReport {
        location: None,
        window: None,
        turbine: TurbineSpec::from(turbine),
        data_points: hours.len(),
        site: aep::site_metrics(&hours),
        aep: aep_result,
        price,
        financials,
        wind_rose: rose,
        monthly_averages,
        yearly_averages,
    })
}

/// [`analyze_series`] for a fetched archive series, tagged with its origin.
pub fn analyze_location(
    cfg: &Config,
    series: &WeatherSeries,
    window: AnalysisWindow,
    location: Location,
    turbine: &Turbine,
    inputs: &EconomicInputs,
    country_code: Option<&str>,
) -> Result<AnalysisReport, AnalysisError> {
    let mut report = analyze_series(cfg, series, turbine, inputs, country_code)?;
    report.location = Some(location);
    report.window = Some(window);
    Ok(report)
}

/// Gap-filled averages of the measured speed column, without hub-height
/// extrapolation.
pub fn series_averages(series: &WeatherSeries, period: AveragingPeriod) -> Result<Vec<PeriodAverage>, AnalysisError> {
    series.validate()?;
    let filled = gap_fill::fill_series(series);
    let rows = filled.samples();
    let averages = period_averages::period_averages(
        rows.iter().map(|s| (s.timestamp.as_str(), s.wind_speed_low_ms, s.direction_deg)),
        period,
    );
    if averages.is_empty() {
        return Err(AnalysisError::InsufficientData("wind speed column has no valid value".into()));
    }
    Ok(averages)
}
