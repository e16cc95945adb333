use crate::models::wind::{DominantDirection, WindRose, WindRoseSector};

pub const SECTORS: usize = 16;
pub const SECTOR_WIDTH_DEG: f64 = 360.0 / SECTORS as f64;

const LABELS: [&str; SECTORS] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Sector whose center (k × 22.5°) is nearest to `direction_deg`.
pub fn sector_index(direction_deg: f64) -> usize {
    let shifted = (direction_deg + SECTOR_WIDTH_DEG / 2.0).rem_euclid(360.0);
    ((shifted / SECTOR_WIDTH_DEG).floor() as usize).min(SECTORS - 1)
}

/// Buckets (direction, speed) pairs into 16 compass sectors. Pairs with a
/// missing or non-finite member are skipped, not zero-filled.
pub fn calculate_wind_rose<I>(pairs: I) -> WindRose
where
    I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
{
    let mut counts = [0usize; SECTORS];
    let mut speed_sums = [0.0_f64; SECTORS];

    for (direction, speed) in pairs {
        let (d, v) = match (direction, speed) {
            (Some(d), Some(v)) if d.is_finite() && v.is_finite() => (d, v),
            _ => continue,
        };
        let idx = sector_index(d);
        counts[idx] += 1;
        speed_sums[idx] += v;
    }

    let total: usize = counts.iter().sum();
    let sectors: Vec<WindRoseSector> = (0..SECTORS)
        .map(|i| WindRoseSector {
            direction_deg: i as f64 * SECTOR_WIDTH_DEG,
            label: LABELS[i].to_string(),
            count: counts[i],
            frequency: if total > 0 { counts[i] as f64 / total as f64 } else { 0.0 },
            avg_speed_ms: if counts[i] > 0 { speed_sums[i] / counts[i] as f64 } else { 0.0 },
        })
        .collect();

    // First sector wins ties
    let dominant = sectors
        .iter()
        .filter(|s| s.count > 0)
        .fold(None::<&WindRoseSector>, |best, s| match best {
            Some(b) if b.count >= s.count => Some(b),
            _ => Some(s),
        })
        .map(|s| DominantDirection {
            direction_deg: s.direction_deg,
            label: s.label.clone(),
            percent: s.frequency * 100.0,
        });

    WindRose { sectors, total_samples: total, dominant }
}
