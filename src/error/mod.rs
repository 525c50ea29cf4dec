//! Error handling module for Specbridge
//!
//! This module provides the error types shared by the pipeline, the CLI,
//! and the JSON-RPC surface.

mod error;

// Re-export the main error types and utilities
pub use error::{BridgeError, ErrorCode, Result};
