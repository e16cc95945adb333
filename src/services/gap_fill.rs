use crate::models::wind::WeatherSeries;

/// Fills `None` holes: interior holes by linear interpolation over index
/// distance, edge holes by holding the nearest valid value. A series with no
/// valid value is returned unchanged. Non-finite values count as holes.
pub fn fill_gaps(data: &[Option<f64>]) -> Vec<Option<f64>> {
    let valid = |v: &Option<f64>| v.filter(|x| x.is_finite());
    let mut result: Vec<Option<f64>> = data.iter().map(valid).collect();

    let mut prev: Option<(usize, f64)> = None;
    let mut i = 0;
    while i < result.len() {
        if let Some(v) = result[i] {
            prev = Some((i, v));
            i += 1;
            continue;
        }

        // Hole run [i, end)
        let mut end = i;
        while end < result.len() && result[end].is_none() {
            end += 1;
        }
        let next = result.get(end).copied().flatten().map(|v| (end, v));

        for (j, slot) in result.iter_mut().enumerate().take(end).skip(i) {
            *slot = match (prev, next) {
                (Some((pi, pv)), Some((ni, nv))) => {
                    Some(pv + ((j - pi) as f64 / (ni - pi) as f64) * (nv - pv))
                }
                (Some((_, pv)), None) => Some(pv),
                (None, Some((_, nv))) => Some(nv),
                (None, None) => None,
            };
        }
        i = end;
    }

    result
}

/// [`fill_gaps`] for bearings in degrees. Interior holes follow the shorter
/// arc between their neighbours, so 350° → 10° passes through north.
/// Results are normalized to [0, 360).
pub fn fill_bearings(data: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last: Option<f64> = None;
    let unwrapped: Vec<Option<f64>> = data
        .iter()
        .map(|v| {
            let d = v.filter(|x| x.is_finite())?;
            let d = match last {
                Some(prev) => prev + (d - prev + 180.0).rem_euclid(360.0) - 180.0,
                None => d,
            };
            last = Some(d);
            Some(d)
        })
        .collect();

    fill_gaps(&unwrapped)
        .into_iter()
        .map(|v| {
            v.map(|d| {
                // rem_euclid can round a tiny negative up to exactly 360
                let d = d.rem_euclid(360.0);
                if d >= 360.0 { 0.0 } else { d }
            })
        })
        .collect()
}

fn fill_column(column: &Option<Vec<Option<f64>>>) -> Option<Vec<Option<f64>>> {
    column.as_ref().map(|c| fill_gaps(c))
}

/// New series with every column gap-filled; the input is left untouched.
pub fn fill_series(series: &WeatherSeries) -> WeatherSeries {
    WeatherSeries {
        time: series.time.clone(),
        wind_speed_low_ms: fill_gaps(&series.wind_speed_low_ms),
        wind_speed_high_ms: fill_column(&series.wind_speed_high_ms),
        wind_direction_deg: series.wind_direction_deg.as_ref().map(|c| fill_bearings(c)),
        temperature_c: fill_column(&series.temperature_c),
        pressure_hpa: fill_column(&series.pressure_hpa),
        low_height_m: series.low_height_m,
        high_height_m: series.high_height_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_gap_is_interpolated() {
        let filled = fill_gaps(&[Some(1.0), None, None, Some(4.0)]);
        assert_eq!(filled, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_edge_gaps_hold_nearest_value() {
        let filled = fill_gaps(&[None, None, Some(5.0), Some(6.0), None]);
        assert_eq!(filled, vec![Some(5.0), Some(5.0), Some(5.0), Some(6.0), Some(6.0)]);
    }

    #[test]
    fn test_all_missing_left_as_is() {
        assert_eq!(fill_gaps(&[None, None]), vec![None, None]);
        assert!(fill_gaps(&[]).is_empty());
    }

    #[test]
    fn test_non_finite_values_are_holes() {
        let filled = fill_gaps(&[Some(2.0), Some(f64::NAN), Some(4.0)]);
        assert_eq!(filled, vec![Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_idempotent() {
        let cases: Vec<Vec<Option<f64>>> = vec![
            vec![None, Some(1.0), None, None, Some(7.0), None],
            vec![Some(3.0), None, Some(-1.0), None, None, None, Some(10.0)],
            vec![None, None, None],
        ];
        for data in cases {
            let once = fill_gaps(&data);
            let twice = fill_gaps(&once);
            assert_eq!(once, twice, "fill_gaps not idempotent for {:?}", data);
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let data = vec![Some(1.0), None, Some(3.0)];
        let snapshot = data.clone();
        let _ = fill_gaps(&data);
        assert_eq!(data, snapshot);
    }

    #[test]
    fn test_fill_series_fills_each_column() {
        let series = WeatherSeries {
            time: vec!["a".into(), "b".into(), "c".into()],
            wind_speed_low_ms: vec![Some(2.0), None, Some(4.0)],
            wind_speed_high_ms: None,
            wind_direction_deg: Some(vec![None, Some(90.0), None]),
            temperature_c: Some(vec![None, None, None]),
            pressure_hpa: Some(vec![Some(1000.0), None, Some(1010.0)]),
            low_height_m: 10.0,
            high_height_m: 100.0,
        };
        let filled = fill_series(&series);
        assert_eq!(filled.wind_speed_low_ms, vec![Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(filled.wind_speed_high_ms, None);
        assert_eq!(filled.wind_direction_deg, Some(vec![Some(90.0); 3]));
        assert_eq!(filled.temperature_c, Some(vec![None, None, None]));
        assert_eq!(filled.pressure_hpa, Some(vec![Some(1000.0), Some(1005.0), Some(1010.0)]));
        assert_eq!(series.wind_speed_low_ms[1], None, "source series must stay untouched");
    }

    fn arc(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_bearing_gap_crosses_north() {
        let filled = fill_bearings(&[Some(350.0), None, Some(10.0)]);
        assert_eq!(filled[0], Some(350.0));
        assert!(arc(filled[1].unwrap(), 0.0) < 1e-9, "expected ~0°, got {:?}", filled[1]);
        assert_eq!(filled[2], Some(10.0));

        let filled = fill_bearings(&[Some(10.0), None, None, Some(340.0)]);
        assert!(arc(filled[1].unwrap(), 0.0) < 1e-9, "{:?}", filled);
        assert!(arc(filled[2].unwrap(), 350.0) < 1e-9, "{:?}", filled);
        assert!(filled.iter().flatten().all(|d| (0.0..360.0).contains(d)));
    }

    #[test]
    fn test_bearings_without_wrap_match_linear_fill() {
        let data = [None, Some(90.0), None, Some(130.0), None];
        assert_eq!(fill_bearings(&data), fill_gaps(&data));
        assert_eq!(fill_bearings(&[None, None]), vec![None, None]);
    }

    #[test]
    fn test_fill_series_keeps_directions_in_sector() {
        let series = WeatherSeries {
            time: vec!["a".into(), "b".into(), "c".into()],
            wind_speed_low_ms: vec![Some(5.0); 3],
            wind_speed_high_ms: None,
            wind_direction_deg: Some(vec![Some(355.0), None, Some(15.0)]),
            temperature_c: None,
            pressure_hpa: None,
            low_height_m: 10.0,
            high_height_m: 100.0,
        };
        let dirs = fill_series(&series).wind_direction_deg.unwrap();
        assert!(arc(dirs[1].unwrap(), 5.0) < 1e-9, "hole must land near N, got {:?}", dirs[1]);
    }
}
