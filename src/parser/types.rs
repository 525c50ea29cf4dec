//! Normalized OpenAPI model types
//!
//! Value objects produced by the document parser. Every type here is
//! constructed once per parse and never mutated afterward; ordered tables
//! use `IndexMap` so document insertion order survives the round trip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root output of parsing one OpenAPI document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Declared `openapi` version string (affects only the version gate)
    pub openapi_version: String,
    /// Document info block
    pub info: DocumentInfo,
    /// Server list in document order
    pub servers: Vec<ServerEntry>,
    /// Paths in document order
    pub paths: Vec<ParsedPath>,
    /// Named component schemas, insertion-ordered
    pub schemas: IndexMap<String, ParsedSchema>,
    /// Named security schemes, insertion-ordered
    pub security_schemes: IndexMap<String, ParsedSecurityScheme>,
}

/// `info` record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One entry of the document's `servers` list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, ServerVariable>>,
}

/// A named server URL variable, limited to default/enum/description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A URL path template plus its operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPath {
    pub path: String,
    pub operations: Vec<ParsedOperation>,
}

/// One HTTP-method handler bound to one path template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedOperation {
    /// Identity: the document's `operationId`, or a deterministically
    /// derived one when absent
    pub operation_id: String,
    /// Upper-cased HTTP method
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Path-level parameters merged ahead of operation-level ones
    pub parameters: Vec<ParsedParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<ParsedRequestBody>,
    pub responses: Vec<ParsedResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "path" => Some(ParameterLocation::Path),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// An inline operation parameter
///
/// Path parameters are intrinsically required; the parser forces
/// `required: true` for them regardless of the document's stated flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedParameter {
    pub name: String,
    pub location: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    pub schema: ParsedSchema,
}

/// Request body with per-media-type schemas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub content: IndexMap<String, ParsedMediaType>,
}

/// One media-type entry of a request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMediaType {
    pub schema: ParsedSchema,
}

/// One response entry, keyed by status code (ranges like `"2XX"` included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub status: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, ParsedSchema>>,
}

/// `additionalProperties`: either a literal boolean or a nested schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<ParsedSchema>),
}

/// The internal schema representation
///
/// Absence of an input key is absence of the corresponding field here; no
/// defaulting happens during normalization. A `$ref` input produces a
/// schema whose only populated field is `reference`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ParsedSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParsedSchema>>,
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<ParsedSchema>>,
    #[serde(rename = "anyOf", skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<ParsedSchema>>,
    #[serde(rename = "allOf", skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<ParsedSchema>>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Kept verbatim when the node is an unresolved internal reference
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ParsedSchema {
    /// Schema holding only a reference pointer
    pub fn from_reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Self::default()
        }
    }
}

/// A security scheme; the meaningful fields depend on the `type` tag, so
/// illegal field combinations are unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParsedSecurityScheme {
    #[serde(rename = "apiKey")]
    ApiKey {
        /// Header or query parameter name
        name: String,
        /// Where the key travels (`header`, `query`, or `cookie`)
        #[serde(rename = "in")]
        location: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "http")]
    Http {
        scheme: String,
        #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
        bearer_format: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        flows: OAuthFlows,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "openIdConnect")]
    OpenIdConnect {
        #[serde(rename = "openIdConnectUrl")]
        open_id_connect_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// Per-flow OAuth2 records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    #[serde(rename = "clientCredentials", skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(rename = "authorizationCode", skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

/// One OAuth2 flow: URLs plus a scopes mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl", skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(rename = "tokenUrl", skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}
