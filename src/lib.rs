pub mod analyze;
pub mod config;
pub mod dataset;
pub mod output;
pub mod profiles;
pub mod ranking;
pub mod scoring;
pub mod telemetry;
