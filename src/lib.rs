//! Specbridge - OpenAPI 3.x documents in, tool-call schemas and project scaffolds out
//!
//! This crate parses OpenAPI documents into a normalized representation,
//! converts each operation into a tool-call schema for a JSON-RPC
//! tool-invocation protocol, and emits TypeScript/Python project scaffolds
//! around the generated tool set. The whole pipeline is pure value-object
//! transformation; the only I/O is fetching URL-form documents.

pub mod config;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod generator;
pub mod parser;
pub mod scaffold;
pub mod server;

pub use config::Config;
pub use envelope::{ErrorBody, ResultEnvelope};
pub use error::{BridgeError, ErrorCode, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "specbridge.yaml";

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 3001;
