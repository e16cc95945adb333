pub mod aep;
pub mod analysis;
pub mod financial;
pub mod gap_fill;
pub mod period_averages;
pub mod physics;
pub mod pricing;
pub mod turbines;
pub mod weather_service;
pub mod wind_rose;
