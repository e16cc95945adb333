pub mod analysis_controller;
