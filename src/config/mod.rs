//! Configuration module for Specbridge
//!
//! This module provides configuration management and loading utilities.

mod config;

// Re-export the main configuration types
pub use config::{Config, FetchConfig, LoggingConfig, ServerConfig};
