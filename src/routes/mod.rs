pub mod analysis_routes;
