//! Error types and handling for Specbridge

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Result type alias for Specbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Closed error taxonomy exposed on every failure envelope.
///
/// `RateLimited` and `Timeout` are reserved for upstream collaborators and
/// never produced by the pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    ParseError,
    UpstreamError,
    InternalError,
    RateLimited,
    Timeout,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::Timeout => "TIMEOUT",
        }
    }
}

/// Main error type for Specbridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Malformed or unsupported input shape or version
    #[error("Invalid input: {message}")]
    InvalidInput { message: String, details: Map<String, Value> },

    /// Input document text was not syntactically valid JSON
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Fetching a URL-form document failed
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Unexpected failure anywhere in the pipeline, caught at the entry
    /// point boundary with the original message preserved
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML errors (configuration loading)
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl BridgeError {
    /// Create an invalid-input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details: Map::new(),
        }
    }

    /// Create an invalid-input error carrying extra diagnostic details
    pub fn invalid_input_with_details<S: Into<String>>(message: S, details: Map<String, Value>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the taxonomy code for the failure envelope
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::InvalidInput { .. } => ErrorCode::InvalidInput,
            BridgeError::Parse { .. } => ErrorCode::ParseError,
            BridgeError::Upstream { .. } | BridgeError::Http(_) => ErrorCode::UpstreamError,
            BridgeError::Internal { .. } | BridgeError::Io(_) | BridgeError::Yaml(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Diagnostic details for the failure envelope
    pub fn details(&self) -> Map<String, Value> {
        match self {
            BridgeError::InvalidInput { details, .. } => details.clone(),
            BridgeError::Parse { message }
            | BridgeError::Upstream { message }
            | BridgeError::Internal { message } => {
                let mut map = Map::new();
                map.insert("message".to_string(), json!(message));
                map
            }
            other => {
                let mut map = Map::new();
                map.insert("message".to_string(), json!(other.to_string()));
                map
            }
        }
    }
}
