//! Tool-schema generation
//!
//! Converts a [`ParsedDocument`](crate::parser::ParsedDocument) into
//! tool-call schemas for the JSON-RPC tool-invocation protocol: one tool
//! per operation, with parameters and flattened request-body fields merged
//! into a single `"object"` input schema.

mod tool_schema;
mod types;

pub use tool_schema::{
    generate_tool_schemas, generate_tool_schemas_from_value, generate_tool_schemas_with_options,
    sanitize_tool_name, GeneratorOptions,
};
pub use types::{GenerationSummary, ToolGenerationResult, ToolSchema};
