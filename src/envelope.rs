//! Success and failure envelopes shared by the CLI and the JSON-RPC surface
//!
//! Every successful pipeline result is wrapped with a retrieval timestamp,
//! an optional source tag, and a warnings list. The warnings list is always
//! present and currently always empty; it exists so collaborators can attach
//! non-fatal diagnostics without changing the wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BridgeError, ErrorCode};

/// Success envelope around a pipeline payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub data: T,
    /// ISO-8601 retrieval timestamp
    pub retrieved_at: DateTime<Utc>,
    /// Where the document came from (URL or caller-supplied tag)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub warnings: Vec<String>,
}

impl<T> ResultEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            retrieved_at: Utc::now(),
            source: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Failure envelope carrying a code from the closed taxonomy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: Map<String, Value>,
}

impl From<&BridgeError> for ErrorBody {
    fn from(err: &BridgeError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}
