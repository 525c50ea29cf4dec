//! OpenAPI document parsing
//!
//! This module turns a raw OpenAPI 3.x document into the normalized
//! [`ParsedDocument`] model consumed by the tool-schema generator and the
//! scaffold generator. Internal component references are kept verbatim at
//! this stage; they are resolved lazily during tool-schema generation.

mod document;
mod schema;
pub mod types;

pub use document::{
    detect_version, derive_operation_id, is_supported_version, parse_document_text,
    parse_document_value, parse_spec, METHOD_ORDER,
};
pub use schema::parse_schema;
pub use types::{
    AdditionalProperties, DocumentInfo, OAuthFlow, OAuthFlows, ParameterLocation, ParsedDocument,
    ParsedMediaType, ParsedOperation, ParsedParameter, ParsedPath, ParsedRequestBody,
    ParsedResponse, ParsedSchema, ParsedSecurityScheme, ServerEntry, ServerVariable,
};
