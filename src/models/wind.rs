use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AnalysisError;

// ─── Turbine catalog types ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CurvePoint {
    pub wind_speed_ms: f64,
    pub power_kw: f64,
}

/// Static catalog entry. Instances live in `services::turbines::CATALOG`.
#[derive(Debug, Clone, Copy)]
pub struct Turbine {
    pub key: &'static str,
    pub name: &'static str,
    pub rated_power_kw: f64,
    pub hub_height_m: f64,
    pub rotor_diameter_m: f64,
    pub cut_in_ms: f64,
    pub rated_speed_ms: f64,
    pub cut_out_ms: f64,
    /// Strictly increasing in wind speed; starts at 0 kW and ends past cut-out at 0 kW.
    pub power_curve: &'static [CurvePoint],
}

/// Owned, serializable view of a [`Turbine`] for API responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TurbineSpec {
    pub key: String,
    pub name: String,
    pub rated_power_kw: f64,
    pub hub_height_m: f64,
    pub rotor_diameter_m: f64,
    pub cut_in_ms: f64,
    pub rated_speed_ms: f64,
    pub cut_out_ms: f64,
    pub power_curve: Vec<CurvePoint>,
}

impl From<&Turbine> for TurbineSpec {
    fn from(t: &Turbine) -> Self {
        Self {
            key: t.key.to_string(),
            name: t.name.to_string(),
            rated_power_kw: t.rated_power_kw,
            hub_height_m: t.hub_height_m,
            rotor_diameter_m: t.rotor_diameter_m,
            cut_in_ms: t.cut_in_ms,
            rated_speed_ms: t.rated_speed_ms,
            cut_out_ms: t.cut_out_ms,
            power_curve: t.power_curve.to_vec(),
        }
    }
}

// ─── Losses ──────────────────────────────────────────────────────────────────

/// Fractional production losses, summed and applied as `(1 − Σ)` to gross AEP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LossFactors {
    pub electrical: f64,
    pub availability: f64,
    pub wake_effect: f64,
    pub transformer: f64,
    pub other: f64,
}

impl Default for LossFactors {
    fn default() -> Self {
        Self {
            electrical: 0.02,
            availability: 0.03,
            wake_effect: 0.05,
            transformer: 0.015,
            other: 0.02,
        }
    }
}

impl LossFactors {
    pub fn total(&self) -> f64 {
        self.electrical + self.availability + self.wake_effect + self.transformer + self.other
    }
}

// ─── Hourly input ────────────────────────────────────────────────────────────

fn default_low_height_m() -> f64 { 10.0 }
fn default_high_height_m() -> f64 { 100.0 }

/// Column form of an hourly weather record. Every present column must have
/// `time.len()` entries; `None` entries are holes to be gap-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherSeries {
    pub time: Vec<String>,
    /// Wind speed at `low_height_m` (m/s)
    pub wind_speed_low_ms: Vec<Option<f64>>,
    /// Wind speed at `high_height_m` (m/s). Absent → single-height shear.
    #[serde(default)]
    pub wind_speed_high_ms: Option<Vec<Option<f64>>>,
    /// Meteorological convention, 0 = N, clockwise
    #[serde(default)]
    pub wind_direction_deg: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub temperature_c: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub pressure_hpa: Option<Vec<Option<f64>>>,
    #[serde(default = "default_low_height_m")]
    pub low_height_m: f64,
    #[serde(default = "default_high_height_m")]
    pub high_height_m: f64,
}

impl WeatherSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Rejects structurally invalid input: no rows, or columns of unequal length.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.is_empty() {
            return Err(AnalysisError::InsufficientData("series has no hourly rows".into()));
        }
        let expected = self.len();
        let columns: [(&'static str, Option<&Vec<Option<f64>>>); 5] = [
            ("wind_speed_low_ms", Some(&self.wind_speed_low_ms)),
            ("wind_speed_high_ms", self.wind_speed_high_ms.as_ref()),
            ("wind_direction_deg", self.wind_direction_deg.as_ref()),
            ("temperature_c", self.temperature_c.as_ref()),
            ("pressure_hpa", self.pressure_hpa.as_ref()),
        ];
        for (column, values) in columns {
            if let Some(values) = values {
                if values.len() != expected {
                    return Err(AnalysisError::MismatchedSeries {
                        column,
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }
        for (name, h) in [("low_height_m", self.low_height_m), ("high_height_m", self.high_height_m)] {
            if !(h.is_finite() && h > 0.0) {
                return Err(AnalysisError::InvalidParameters {
                    name,
                    reason: format!("reference height must be positive, got {}", h),
                });
            }
        }
        Ok(())
    }

    /// Row view. Callers must have validated the series first.
    pub fn samples(&self) -> Vec<HourlySample> {
        let at = |col: &Option<Vec<Option<f64>>>, i: usize| col.as_ref().and_then(|c| c[i]);
        self.time
            .iter()
            .enumerate()
            .map(|(i, t)| HourlySample {
                timestamp: t.clone(),
                wind_speed_low_ms: self.wind_speed_low_ms[i],
                wind_speed_high_ms: at(&self.wind_speed_high_ms, i),
                direction_deg: at(&self.wind_direction_deg, i),
                temperature_c: at(&self.temperature_c, i),
                pressure_hpa: at(&self.pressure_hpa, i),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub timestamp: String,
    pub wind_speed_low_ms: Option<f64>,
    pub wind_speed_high_ms: Option<f64>,
    pub direction_deg: Option<f64>,
    pub temperature_c: Option<f64>,
    pub pressure_hpa: Option<f64>,
}

/// Hourly state at hub height, derived once per (sample, turbine).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessedHour {
    pub wind_speed_hub_ms: f64,
    pub air_density_kg_m3: f64,
    pub shear_alpha: f64,
    pub direction_deg: Option<f64>,
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AepResult {
    /// Pre-loss annual energy (MWh/yr)
    pub gross_aep_mwh: f64,
    /// Post-loss annual energy (MWh/yr)
    pub net_aep_mwh: f64,
    /// net AEP ÷ (rated kW × 8760 / 1000), 0..1
    pub capacity_factor: f64,
    pub avg_power_kw: f64,
    pub loss_fraction: f64,
    pub hours: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WindRoseSector {
    /// Sector center (deg)
    pub direction_deg: f64,
    pub label: String,
    pub count: usize,
    /// count ÷ total valid samples
    pub frequency: f64,
    pub avg_speed_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DominantDirection {
    pub direction_deg: f64,
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WindRose {
    pub sectors: Vec<WindRoseSector>,
    pub total_samples: usize,
    /// `None` when no sample had both a direction and a speed
    pub dominant: Option<DominantDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AveragingPeriod {
    Hour,
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodAverage {
    /// Timestamp prefix identifying the bucket, e.g. `2024-03`
    pub period: String,
    pub avg_speed_ms: f64,
    /// Vector mean, 0..360
    pub avg_direction_deg: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct SiteMetrics {
    pub avg_wind_speed_hub_ms: f64,
    pub avg_shear_alpha: f64,
    pub avg_air_density_kg_m3: f64,
}

// ─── Open-Meteo wire types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub hourly: Option<ArchiveHourly>,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_speed_100m: Option<Vec<Option<f64>>>,
    pub wind_direction_100m: Option<Vec<Option<f64>>>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
    pub surface_pressure: Option<Vec<Option<f64>>>,
}

/// Body returned with a non-success status, e.g. `{"error": true, "reason": "..."}`
#[derive(Debug, Deserialize)]
pub struct ArchiveError {
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> WeatherSeries {
        WeatherSeries {
            time: (0..n).map(|h| format!("2024-01-01T{:02}:00", h)).collect(),
            wind_speed_low_ms: vec![Some(5.0); n],
            wind_speed_high_ms: None,
            wind_direction_deg: Some(vec![Some(90.0); n]),
            temperature_c: None,
            pressure_hpa: None,
            low_height_m: 10.0,
            high_height_m: 100.0,
        }
    }

    #[test]
    fn test_validate_rejects_mismatched_columns() {
        let mut s = series(3);
        s.pressure_hpa = Some(vec![Some(1013.0); 2]);
        match s.validate() {
            Err(AnalysisError::MismatchedSeries { column, expected, actual }) => {
                assert_eq!(column, "pressure_hpa");
                assert_eq!((expected, actual), (3, 2));
            }
            other => panic!("expected MismatchedSeries, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_series() {
        assert!(matches!(series(0).validate(), Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_height() {
        let mut s = series(2);
        s.low_height_m = 0.0;
        assert!(matches!(s.validate(), Err(AnalysisError::InvalidParameters { .. })));
    }

    #[test]
    fn test_samples_carry_absent_columns_as_none() {
        let s = series(2);
        s.validate().unwrap();
        let rows = s.samples();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].timestamp, "2024-01-01T01:00");
        assert_eq!(rows[1].direction_deg, Some(90.0));
        assert_eq!(rows[1].temperature_c, None);
    }

    #[test]
    fn test_default_losses_sum() {
        assert!((LossFactors::default().total() - 0.135).abs() < 1e-12);
    }
}
