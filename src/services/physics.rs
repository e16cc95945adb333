//! ============================================================
//!  Wind physics
//!
//!   1. Air density     – ideal gas law from temperature & pressure
//!   2. Wind shear      – power-law exponent fitted from two heights,
//!                        extrapolated to hub height
//!   3. Power curve     – piecewise-linear turbine curve lookup
//!   4. Power output    – curve output scaled by ρ / ρ₀
//! ============================================================

use crate::error::AnalysisError;
use crate::models::wind::{CurvePoint, Turbine};

// ─── Physical constants ──────────────────────────────────────
/// Specific gas constant of dry air (J/(kg·K))
pub const R_SPECIFIC: f64 = 287.058;
/// Standard sea-level air density (kg/m³)
pub const STD_AIR_DENSITY: f64 = 1.225;
pub const HOURS_PER_YEAR: f64 = 8760.0;

pub const DEFAULT_SHEAR_ALPHA: f64 = 0.14;
pub const MIN_SHEAR_ALPHA: f64 = 0.05;
pub const MAX_SHEAR_ALPHA: f64 = 0.5;

/// Air density (kg/m³) via `ρ = P / (R · T)`.
///
/// * `temp_c`       – air temperature, expected −60 … +50 °C
/// * `pressure_hpa` – surface pressure, expected 500 … 1100 hPa
///
/// Inputs are not clamped.
pub fn air_density(temp_c: f64, pressure_hpa: f64) -> f64 {
    let t_kelvin = temp_c + 273.15;
    let p_pa = pressure_hpa * 100.0;
    p_pa / (R_SPECIFIC * t_kelvin)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShearProfile {
    pub wind_speed_ms: f64,
    pub alpha: f64,
}

/// Fits `α = ln(v2/v1) / ln(h2/h1)` from two measurements and extrapolates
/// `v2` to `target_height_m`. Degenerate fits (non-positive or equal speeds,
/// equal heights, non-finite result) use [`DEFAULT_SHEAR_ALPHA`]; α is always
/// clamped to [`MIN_SHEAR_ALPHA`, `MAX_SHEAR_ALPHA`].
pub fn wind_shear(v1: f64, h1: f64, v2: f64, h2: f64, target_height_m: f64) -> ShearProfile {
    let mut alpha = DEFAULT_SHEAR_ALPHA;

    if v1 > 0.0 && v2 > 0.0 && v1 != v2 && h1 > 0.0 && h2 > 0.0 && h1 != h2 {
        let fitted = (v2 / v1).ln() / (h2 / h1).ln();
        if fitted.is_finite() {
            alpha = fitted;
        }
    }
    let alpha = alpha.clamp(MIN_SHEAR_ALPHA, MAX_SHEAR_ALPHA);

    ShearProfile {
        wind_speed_ms: v2 * (target_height_m / h2).powf(alpha),
        alpha,
    }
}

/// Single-height extrapolation with the default exponent.
pub fn wind_shear_single(v: f64, h: f64, target_height_m: f64) -> ShearProfile {
    ShearProfile {
        wind_speed_ms: v * (target_height_m / h).powf(DEFAULT_SHEAR_ALPHA),
        alpha: DEFAULT_SHEAR_ALPHA,
    }
}

/// Piecewise-linear lookup. Zero at/below the first point and at/above the
/// last; the curve must be sorted ascending by speed.
pub fn interpolate_power_curve(wind_speed_ms: f64, curve: &[CurvePoint]) -> f64 {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return 0.0,
    };
    if wind_speed_ms <= first.wind_speed_ms || wind_speed_ms >= last.wind_speed_ms {
        return 0.0;
    }

    for pair in curve.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if wind_speed_ms >= a.wind_speed_ms && wind_speed_ms < b.wind_speed_ms {
            let ratio = (wind_speed_ms - a.wind_speed_ms) / (b.wind_speed_ms - a.wind_speed_ms);
            return a.power_kw + ratio * (b.power_kw - a.power_kw);
        }
    }
    0.0
}

/// Electrical output (kW) with a linear density correction `ρ / 1.225`.
/// No attempt is made to model density effects near rated power.
#[inline]
pub fn power_output(wind_speed_ms: f64, turbine: &Turbine, air_density_kg_m3: f64) -> f64 {
    interpolate_power_curve(wind_speed_ms, turbine.power_curve) * (air_density_kg_m3 / STD_AIR_DENSITY)
}

/// Curve must be non-empty, finite and strictly increasing in speed.
pub fn validate_power_curve(turbine_key: &str, curve: &[CurvePoint]) -> Result<(), AnalysisError> {
    let invalid = |reason: String| AnalysisError::InvalidPowerCurve {
        turbine: turbine_key.to_string(),
        reason,
    };

    if curve.len() < 2 {
        return Err(invalid(format!("needs at least 2 points, has {}", curve.len())));
    }
    if let Some(p) = curve.iter().find(|p| !p.wind_speed_ms.is_finite() || !p.power_kw.is_finite()) {
        return Err(invalid(format!("non-finite point ({}, {})", p.wind_speed_ms, p.power_kw)));
    }
    for pair in curve.windows(2) {
        if pair[1].wind_speed_ms <= pair[0].wind_speed_ms {
            return Err(invalid(format!(
                "speeds not strictly increasing at {} → {} m/s",
                pair[0].wind_speed_ms, pair[1].wind_speed_ms
            )));
        }
    }
    Ok(())
}
