pub mod assessments;
pub mod config;
pub mod error;
pub mod predictor;
pub mod telemetry;
