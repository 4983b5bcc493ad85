//! Shared utilities for stock-trend
//!
//! This crate provides the ambient pieces used across the stock-trend
//! workspace: tracing subscriber setup and the configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
