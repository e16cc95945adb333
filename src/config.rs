use std::collections::HashMap;

use serde::Deserialize;

use crate::error::AnalysisError;
use crate::models::finance::FinancialParams;
use crate::models::wind::LossFactors;

fn default_port() -> u16 { 8080 }
fn default_archive_url() -> String { "https://archive-api.open-meteo.com/v1/archive".to_string() }
fn default_lookback_years() -> u32 { 1 }
fn default_lag_days() -> i64 { 5 }
fn default_timeout_s() -> u64 { 60 }
fn default_cache_ttl_s() -> i64 { 86_400 }
fn default_low_height_m() -> f64 { 10.0 }
fn default_high_height_m() -> f64 { 100.0 }
fn default_capex_per_kw() -> f64 { 1100.0 }
fn default_opex_per_mw() -> f64 { 30_000.0 }
fn default_lifetime_years() -> u32 { FinancialParams::DEFAULT_LIFETIME_YEARS }
fn default_discount_rate() -> f64 { FinancialParams::DEFAULT_DISCOUNT_RATE }
fn default_degradation_rate() -> f64 { FinancialParams::DEFAULT_DEGRADATION_RATE }
fn default_inflation_rate() -> f64 { FinancialParams::DEFAULT_INFLATION_RATE }
fn default_price_per_kwh() -> f64 { 0.09 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub economics: EconomicDefaults,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub losses: LossFactors,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Open-Meteo archive access and the reference heights of the speed columns it returns.
#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    /// Length of the analysis window. Clamped to 1..=10 when the window is built.
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,
    /// The archive trails real time by a few days.
    #[serde(default = "default_lag_days")]
    pub lag_days: i64,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
    #[serde(default = "default_cache_ttl_s")]
    pub cache_ttl_s: i64,
    #[serde(default = "default_low_height_m")]
    pub low_height_m: f64,
    #[serde(default = "default_high_height_m")]
    pub high_height_m: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            lookback_years: default_lookback_years(),
            lag_days: default_lag_days(),
            timeout_s: default_timeout_s(),
            cache_ttl_s: default_cache_ttl_s(),
            low_height_m: default_low_height_m(),
            high_height_m: default_high_height_m(),
        }
    }
}

/// Fallback values for every economic input a request leaves out.
#[derive(Debug, Deserialize, Clone)]
pub struct EconomicDefaults {
    #[serde(default = "default_capex_per_kw")]
    pub capex_per_kw: f64,
    #[serde(default = "default_opex_per_mw")]
    pub opex_per_mw: f64,
    #[serde(default = "default_lifetime_years")]
    pub lifetime_years: u32,
    #[serde(default = "default_discount_rate")]
    pub discount_rate: f64,
    #[serde(default = "default_degradation_rate")]
    pub degradation_rate: f64,
    #[serde(default = "default_inflation_rate")]
    pub inflation_rate: f64,
}

impl Default for EconomicDefaults {
    fn default() -> Self {
        Self {
            capex_per_kw: default_capex_per_kw(),
            opex_per_mw: default_opex_per_mw(),
            lifetime_years: default_lifetime_years(),
            discount_rate: default_discount_rate(),
            degradation_rate: default_degradation_rate(),
            inflation_rate: default_inflation_rate(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default = "default_price_per_kwh")]
    pub default_price_per_kwh: f64,
    /// ISO 3166 alpha-2 code → $/kWh
    #[serde(default)]
    pub country_prices: HashMap<String, f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_price_per_kwh: default_price_per_kwh(),
            country_prices: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path, e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(content).map_err(|e| AnalysisError::Config(e.to_string()))
    }
}
