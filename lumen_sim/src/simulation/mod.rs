pub mod app_state;
pub mod config;
pub mod ground_truth;
pub mod noise;
pub mod prng;
pub mod telemetry;
pub mod vision;
