pub mod api;
pub mod finance;
pub mod wind;
