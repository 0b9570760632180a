//! Orchestration, configuration and logging for the healthcare silver pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
