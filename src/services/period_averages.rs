use std::collections::BTreeMap;

use crate::models::wind::{AveragingPeriod, PeriodAverage};

impl AveragingPeriod {
    /// Length of the ISO timestamp prefix (`YYYY-MM-DDTHH`) that identifies a bucket.
    pub fn key_len(self) -> usize {
        match self {
            AveragingPeriod::Hour => 13,
            AveragingPeriod::Day => 10,
            AveragingPeriod::Month => 7,
            AveragingPeriod::Year => 4,
        }
    }
}

/// Circular mean of bearings in degrees, normalized to [0, 360).
pub fn vector_mean_direction(directions: &[f64]) -> Option<f64> {
    if directions.is_empty() {
        return None;
    }
    let (x, y) = directions.iter().fold((0.0, 0.0), |(x, y), d| {
        let r = d.to_radians();
        (x + r.sin(), y + r.cos())
    });
    Some(x.atan2(y).to_degrees().rem_euclid(360.0))
}

#[derive(Default)]
struct Bucket {
    speeds: Vec<f64>,
    directions: Vec<f64>,
}

/// Groups `(timestamp, speed, direction)` rows by timestamp prefix, in
/// chronological order. Buckets with no finite speed are dropped.
pub fn period_averages<'a, I>(rows: I, period: AveragingPeriod) -> Vec<PeriodAverage>
where
    I: IntoIterator<Item = (&'a str, Option<f64>, Option<f64>)>,
{
    let key_len = period.key_len();
    let mut buckets: BTreeMap<&'a str, Bucket> = BTreeMap::new();

    for (timestamp, speed, direction) in rows {
        let key = timestamp.get(..key_len).unwrap_or(timestamp);
        let bucket = buckets.entry(key).or_default();
        if let Some(v) = speed.filter(|v| v.is_finite()) {
            bucket.speeds.push(v);
        }
        if let Some(d) = direction.filter(|d| d.is_finite()) {
            bucket.directions.push(d);
        }
    }

    buckets
        .into_iter()
        .filter(|(_, b)| !b.speeds.is_empty())
        .map(|(key, b)| PeriodAverage {
            period: key.to_string(),
            avg_speed_ms: b.speeds.iter().sum::<f64>() / b.speeds.len() as f64,
            avg_direction_deg: vector_mean_direction(&b.directions),
            samples: b.speeds.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_mean_wraps_north() {
        let d = vector_mean_direction(&[350.0, 10.0]).unwrap();
        assert!(d < 1e-9 || (360.0 - d) < 1e-9, "expected ~0°, got {}", d);
        assert_relative_eq!(vector_mean_direction(&[80.0, 100.0]).unwrap(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(vector_mean_direction(&[260.0, 280.0]).unwrap(), 270.0, epsilon = 1e-9);
        assert!(vector_mean_direction(&[]).is_none());
    }

    #[test]
    fn test_monthly_grouping_is_chronological() {
        let rows = vec![
            ("2024-02-01T00:00", Some(6.0), Some(90.0)),
            ("2024-01-01T00:00", Some(4.0), Some(180.0)),
            ("2024-01-15T12:00", Some(8.0), Some(180.0)),
            ("2024-03-01T00:00", None, Some(0.0)),
        ];
        let avgs = period_averages(rows, AveragingPeriod::Month);
        assert_eq!(avgs.len(), 2, "month without speed must be dropped");
        assert_eq!(avgs[0].period, "2024-01");
        assert_relative_eq!(avgs[0].avg_speed_ms, 6.0);
        assert_relative_eq!(avgs[0].avg_direction_deg.unwrap(), 180.0, epsilon = 1e-9);
        assert_eq!(avgs[0].samples, 2);
        assert_eq!(avgs[1].period, "2024-02");
    }

    #[test]
    fn test_day_and_year_keys() {
        let rows = vec![
            ("2023-12-31T23:00", Some(2.0), None),
            ("2024-01-01T00:00", Some(4.0), None),
            ("2024-01-01T01:00", Some(6.0), None),
        ];
        let days = period_averages(rows.clone(), AveragingPeriod::Day);
        assert_eq!(days.iter().map(|p| p.period.as_str()).collect::<Vec<_>>(), ["2023-12-31", "2024-01-01"]);
        let years = period_averages(rows, AveragingPeriod::Year);
        assert_eq!(years.len(), 2);
        assert_relative_eq!(years[1].avg_speed_ms, 5.0);
        assert!(years[1].avg_direction_deg.is_none());
    }
}
