use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;
use chrono::{DateTime, Duration, Utc};

use crate::config::Config;
use crate::models::api::AnalysisWindow;
use crate::models::wind::WeatherSeries;

#[derive(Clone, Debug)]
pub struct CachedSeries {
    pub fetched_at: DateTime<Utc>,
    pub series: WeatherSeries,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub http: reqwest::Client,
    /// Fetched archive series keyed by [`cache_key`]
    pub weather_cache: Arc<RwLock<HashMap<String, CachedSeries>>>,
    pub started_at: Instant,
}

/// Location rounded to 0.1° plus the requested window.
pub fn cache_key(lat: f64, lon: f64, window: &AnalysisWindow) -> String {
    format!("{:.1}_{:.1}_{}_{}", lat, lon, window.start, window.end)
}

impl AppState {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            weather_cache: Arc::new(RwLock::new(HashMap::new())),
            started_at: Instant::now(),
        }
    }

    pub fn cached_series(&self, key: &str, ttl_s: i64, now: DateTime<Utc>) -> Option<WeatherSeries> {
        if let Ok(map) = self.weather_cache.read() {
            map.get(key)
                .filter(|entry| now - entry.fetched_at < Duration::seconds(ttl_s))
                .map(|entry| entry.series.clone())
        } else {
            None
        }
    }

    pub fn store_series(&self, key: String, series: WeatherSeries, now: DateTime<Utc>) {
        if let Ok(mut map) = self.weather_cache.write() {
            map.insert(key, CachedSeries { fetched_at: now, series });
        }
    }

    /// Drops entries older than `ttl_s`; returns how many were removed.
    pub fn evict_expired(&self, ttl_s: i64, now: DateTime<Utc>) -> usize {
        if let Ok(mut map) = self.weather_cache.write() {
            let before = map.len();
            map.retain(|_, entry| now - entry.fetched_at < Duration::seconds(ttl_s));
            before - map.len()
        } else {
            0
        }
    }

    pub fn cache_len(&self) -> usize {
        self.weather_cache.read().map(|m| m.len()).unwrap_or(0)
    }
}

/// Router state; handlers extract `State<AppState>` and/or `State<Config>`.
#[derive(Clone)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(s: &SharedState) -> Self {
        s.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(s: &SharedState) -> Self {
        s.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series() -> WeatherSeries {
        WeatherSeries {
            time: vec!["2024-01-01T00:00".into()],
            wind_speed_low_ms: vec![Some(5.0)],
            wind_speed_high_ms: None,
            wind_direction_deg: None,
            temperature_c: None,
            pressure_hpa: None,
            low_height_m: 10.0,
            high_height_m: 100.0,
        }
    }

    #[test]
    fn test_cache_key_rounds_location() {
        let w = AnalysisWindow {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(cache_key(39.9251, 32.8349, &w), "39.9_32.8_2023-01-01_2024-01-01");
        assert_eq!(cache_key(39.9251, 32.8349, &w), cache_key(39.94, 32.81, &w));
    }

    #[test]
    fn test_cache_respects_ttl() {
        let state = AppState::new(reqwest::Client::new());
        let t0 = Utc::now();
        state.store_series("k".into(), series(), t0);
        assert!(state.cached_series("k", 60, t0 + Duration::seconds(30)).is_some());
        assert!(state.cached_series("k", 60, t0 + Duration::seconds(61)).is_none());
        assert!(state.cached_series("missing", 60, t0).is_none());
        assert_eq!(state.evict_expired(60, t0 + Duration::seconds(120)), 1);
        assert_eq!(state.cache_len(), 0);
    }
}
