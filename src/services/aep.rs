use tracing::debug;

use crate::error::AnalysisError;
use crate::models::wind::{AepResult, HourlySample, LossFactors, ProcessedHour, SiteMetrics, Turbine};
use crate::services::physics::{self, HOURS_PER_YEAR};

/// Used per hour when the temperature column is entirely missing.
pub const FALLBACK_TEMPERATURE_C: f64 = 15.0;
/// Used per hour when the pressure column is entirely missing.
pub const FALLBACK_PRESSURE_HPA: f64 = 1013.0;

/// Shear-corrects each gap-filled sample to hub height and computes its air
/// density. Two-height fit when the high column is present, default α otherwise.
pub fn process_hours(
    samples: &[HourlySample],
    low_height_m: f64,
    high_height_m: f64,
    turbine: &Turbine,
) -> Result<Vec<ProcessedHour>, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InsufficientData("no hourly samples".into()));
    }

    samples
        .iter()
        .map(|s| -> Result<ProcessedHour, AnalysisError> {
            let v_low = s.wind_speed_low_ms.ok_or_else(|| {
                AnalysisError::InsufficientData("wind speed column has no valid value".into())
            })?;

            let shear = match s.wind_speed_high_ms {
                Some(v_high) => physics::wind_shear(v_low, low_height_m, v_high, high_height_m, turbine.hub_height_m),
                None => physics::wind_shear_single(v_low, low_height_m, turbine.hub_height_m),
            };

            let density = physics::air_density(
                s.temperature_c.unwrap_or(FALLBACK_TEMPERATURE_C),
                s.pressure_hpa.unwrap_or(FALLBACK_PRESSURE_HPA),
            );

            Ok(ProcessedHour {
                wind_speed_hub_ms: shear.wind_speed_ms.max(0.0),
                air_density_kg_m3: density,
                shear_alpha: shear.alpha,
                direction_deg: s.direction_deg,
            })
        })
        .collect()
}

/// Annualized energy production. A year is exactly 8760 hours regardless of
/// the calendar span of the series.
pub fn calculate_aep(
    hours: &[ProcessedHour],
    turbine: &Turbine,
    losses: &LossFactors,
) -> Result<AepResult, AnalysisError> {
    physics::validate_power_curve(turbine.key, turbine.power_curve)?;
    if hours.is_empty() {
        return Err(AnalysisError::InsufficientData("no processed hours".into()));
    }

    // kW over one hour → kWh
    let total_energy_kwh: f64 = hours
        .iter()
        .map(|h| physics::power_output(h.wind_speed_hub_ms, turbine, h.air_density_kg_m3))
        .sum();

    let years = hours.len() as f64 / HOURS_PER_YEAR;
    let gross_aep_mwh = (total_energy_kwh / years) / 1000.0;

    let loss_fraction = losses.total();
    let net_aep_mwh = gross_aep_mwh * (1.0 - loss_fraction);

    let max_possible_mwh = turbine.rated_power_kw * HOURS_PER_YEAR / 1000.0;
    let capacity_factor = if max_possible_mwh > 0.0 { net_aep_mwh / max_possible_mwh } else { 0.0 };

    debug!(
        turbine = turbine.key,
        hours = hours.len(),
        gross_aep_mwh,
        net_aep_mwh,
        capacity_factor,
        "AEP computed"
    );

    Ok(AepResult {
        gross_aep_mwh,
        net_aep_mwh,
        capacity_factor,
        avg_power_kw: total_energy_kwh / hours.len() as f64,
        loss_fraction,
        hours: hours.len(),
    })
}

pub fn site_metrics(hours: &[ProcessedHour]) -> SiteMetrics {
    let n = hours.len().max(1) as f64;
    SiteMetrics {
        avg_wind_speed_hub_ms: hours.iter().map(|h| h.wind_speed_hub_ms).sum::<f64>() / n,
        avg_shear_alpha: hours.iter().map(|h| h.shear_alpha).sum::<f64>() / n,
        avg_air_density_kg_m3: hours.iter().map(|h| h.air_density_kg_m3).sum::<f64>() / n,
    }
}
