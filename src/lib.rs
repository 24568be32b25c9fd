pub mod agents;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod error;
pub mod provider;
pub mod runner;
pub mod session;
pub mod telemetry;
pub mod transcript;
pub mod workflow;
