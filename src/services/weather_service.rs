use chrono::{Duration, Months, NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::WeatherConfig;
use crate::error::AnalysisError;
use crate::models::api::AnalysisWindow;
use crate::models::wind::{ArchiveError, ArchiveHourly, ArchiveResponse, WeatherSeries};
use crate::shared_state::{cache_key, AppState};

pub const MAX_LOOKBACK_YEARS: u32 = 10;

const HOURLY_FIELDS: &str = "wind_speed_10m,wind_speed_100m,wind_direction_100m,temperature_2m,surface_pressure";

/// `[today − lag − lookback, today − lag]`, lookback clamped to 1..=10 years.
pub fn analysis_window(cfg: &WeatherConfig, today: NaiveDate) -> AnalysisWindow {
    let end = today - Duration::days(cfg.lag_days.max(0));
    let years = cfg.lookback_years.clamp(1, MAX_LOOKBACK_YEARS);
    let start = end
        .checked_sub_months(Months::new(12 * years))
        .unwrap_or(end - Duration::days(365 * years as i64));
    AnalysisWindow { start, end }
}

pub fn archive_url(cfg: &WeatherConfig, lat: f64, lon: f64, window: &AnalysisWindow) -> String {
    format!(
        "{}?latitude={:.4}&longitude={:.4}&start_date={}&end_date={}&hourly={}&wind_speed_unit=ms&timezone=auto",
        cfg.archive_url, lat, lon, window.start, window.end, HOURLY_FIELDS
    )
}

/// Maps the archive's column names onto a [`WeatherSeries`]; columns the
/// archive left out stay absent.
pub fn series_from_archive(hourly: ArchiveHourly, cfg: &WeatherConfig) -> WeatherSeries {
    WeatherSeries {
        time: hourly.time,
        wind_speed_low_ms: hourly.wind_speed_10m,
        wind_speed_high_ms: hourly.wind_speed_100m,
        wind_direction_deg: hourly.wind_direction_100m,
        temperature_c: hourly.temperature_2m,
        pressure_hpa: hourly.surface_pressure,
        low_height_m: cfg.low_height_m,
        high_height_m: cfg.high_height_m,
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AnalysisError> {
    if !(lat.is_finite() && (-90.0..=90.0).contains(&lat)) {
        return Err(AnalysisError::InvalidParameters { name: "latitude", reason: format!("{} outside -90..90", lat) });
    }
    if !(lon.is_finite() && (-180.0..=180.0).contains(&lon)) {
        return Err(AnalysisError::InvalidParameters { name: "longitude", reason: format!("{} outside -180..180", lon) });
    }
    Ok(())
}

/// Hourly archive series for a point, served from the cache while fresh.
pub async fn fetch_hourly_series(
    state: &AppState,
    cfg: &WeatherConfig,
    lat: f64,
    lon: f64,
) -> Result<(WeatherSeries, AnalysisWindow), AnalysisError> {
    validate_coordinates(lat, lon)?;

    let now = Utc::now();
    let window = analysis_window(cfg, now.date_naive());
    let key = cache_key(lat, lon, &window);

    if let Some(series) = state.cached_series(&key, cfg.cache_ttl_s, now) {
        info!(%key, rows = series.len(), "weather cache hit");
        return Ok((series, window));
    }

    let evicted = state.evict_expired(cfg.cache_ttl_s, now);
    if evicted > 0 {
        info!(evicted, "expired weather cache entries dropped");
    }

    let url = archive_url(cfg, lat, lon, &window);
    info!(%url, "fetching hourly archive");

    let response = state.http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let reason = match response.json::<ArchiveError>().await {
            Ok(body) => body.reason.unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        };
        warn!(%status, %reason, "weather archive rejected request");
        return Err(AnalysisError::WeatherUpstream(reason));
    }

    let body: ArchiveResponse = response.json().await?;
    let hourly = match body.hourly {
        Some(h) if !h.time.is_empty() => h,
        _ => return Err(AnalysisError::WeatherUpstream("no hourly data".into())),
    };

    let series = series_from_archive(hourly, cfg);
    info!(rows = series.len(), start = %window.start, end = %window.end, "hourly archive received");
    state.store_series(key, series.clone(), now);

    Ok((series, window))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_trails_today_by_lag() {
        let cfg = WeatherConfig::default();
        let w = analysis_window(&cfg, date(2025, 6, 15));
        assert_eq!(w.end, date(2025, 6, 10));
        assert_eq!(w.start, date(2024, 6, 10));
    }

    #[test]
    fn test_window_lookback_is_clamped() {
        let cfg = WeatherConfig { lookback_years: 40, ..WeatherConfig::default() };
        let w = analysis_window(&cfg, date(2025, 1, 6));
        assert_eq!(w.start, date(2015, 1, 1));

        let cfg = WeatherConfig { lookback_years: 0, ..WeatherConfig::default() };
        let w = analysis_window(&cfg, date(2025, 1, 6));
        assert_eq!(w.start, date(2024, 1, 1));
    }

    #[test]
    fn test_window_handles_leap_day() {
        let cfg = WeatherConfig { lag_days: 0, ..WeatherConfig::default() };
        let w = analysis_window(&cfg, date(2024, 2, 29));
        assert_eq!(w.start, date(2023, 2, 28));
    }

    #[test]
    fn test_archive_url_parameters() {
        let cfg = WeatherConfig::default();
        let w = AnalysisWindow { start: date(2024, 1, 1), end: date(2024, 12, 31) };
        let url = archive_url(&cfg, 39.925, 32.83649, &w);
        assert!(url.starts_with("https://archive-api.open-meteo.com/v1/archive?"));
        assert!(url.contains("latitude=39.9250&longitude=32.8365"));
        assert!(url.contains("start_date=2024-01-01&end_date=2024-12-31"));
        assert!(url.contains("wind_speed_100m"));
        assert!(url.contains("wind_speed_unit=ms"));
    }

    #[test]
    fn test_series_from_archive_json() {
        let json = r#"{
            "latitude": 39.9,
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "wind_speed_10m": [4.2, null],
                "wind_speed_100m": [6.1, 6.4],
                "temperature_2m": [1.5, 1.2],
                "surface_pressure": [912.0, 911.8]
            }
        }"#;
        let resp: ArchiveResponse = serde_json::from_str(json).unwrap();
        let s = series_from_archive(resp.hourly.unwrap(), &WeatherConfig::default());
        assert_eq!(s.len(), 2);
        assert_eq!(s.wind_speed_low_ms, vec![Some(4.2), None]);
        assert!(s.wind_direction_deg.is_none());
        assert_eq!(s.high_height_m, 100.0);
        s.validate().unwrap();
    }

    #[test]
    fn test_coordinates_validated() {
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(-33.9, 151.2).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_serves_from_cache_without_network() {
        let state = AppState::new(reqwest::Client::new());
        let cfg = WeatherConfig { archive_url: "http://127.0.0.1:1/unreachable".into(), ..WeatherConfig::default() };
        let now = Utc::now();
        let window = analysis_window(&cfg, now.date_naive());
        let series = WeatherSeries {
            time: vec!["2024-01-01T00:00".into()],
            wind_speed_low_ms: vec![Some(7.0)],
            wind_speed_high_ms: None,
            wind_direction_deg: None,
            temperature_c: None,
            pressure_hpa: None,
            low_height_m: 10.0,
            high_height_m: 100.0,
        };
        state.store_series(cache_key(40.0, 30.0, &window), series.clone(), now);

        let (cached, w) = fetch_hourly_series(&state, &cfg, 40.02, 29.98).await.unwrap();
        assert_eq!(cached, series);
        assert_eq!(w, window);
    }
}
