//! Document retrieval
//!
//! The pipeline's single suspension point: turning a caller-supplied
//! source (inline text, a pre-parsed value, or a URL) into a raw document
//! value plus an optional source tag for the result envelope. Retries and
//! caching are deliberately absent; each call stands alone.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{BridgeError, Result};

/// Where a document comes from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Raw JSON text supplied inline
    Inline(String),
    /// An already-deserialized document
    Value(Value),
    /// A URL to fetch the document from
    Url(String),
}

/// Resolve a source into a raw document value and an optional source tag.
///
/// URL fetch failures map to `UPSTREAM_ERROR`; syntactically invalid JSON
/// (inline or fetched) maps to `PARSE_ERROR`.
pub async fn fetch_document(
    source: &DocumentSource,
    timeout: Duration,
) -> Result<(Value, Option<String>)> {
    match source {
        DocumentSource::Inline(text) => {
            let doc = serde_json::from_str(text)
                .map_err(|e| BridgeError::parse(format!("invalid JSON: {}", e)))?;
            Ok((doc, None))
        }
        DocumentSource::Value(doc) => Ok((doc.clone(), None)),
        DocumentSource::Url(raw_url) => {
            let parsed_url = Url::parse(raw_url)
                .map_err(|e| BridgeError::invalid_input(format!("invalid document URL: {}", e)))?;
            debug!("fetching document from {}", parsed_url);

            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let response = client.get(parsed_url.clone()).send().await?;
            let response = response.error_for_status().map_err(|e| {
                BridgeError::upstream(format!("document fetch failed: {}", e))
            })?;
            let body = response.text().await?;

            let doc = serde_json::from_str(&body)
                .map_err(|e| BridgeError::parse(format!("invalid JSON from {}: {}", parsed_url, e)))?;
            Ok((doc, Some(raw_url.clone())))
        }
    }
}
