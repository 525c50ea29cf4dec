//! Operation-to-tool-schema conversion
//!
//! Iterates a parsed document's operations (paths in document order,
//! methods in the parser's fixed order) and produces one tool schema per
//! operation. Internal component references are inlined here, `allOf`
//! compositions are merged, and request-body object properties are
//! flattened to the top level of the input schema.

use std::panic::{catch_unwind, AssertUnwindSafe};

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::types::{GenerationSummary, ToolGenerationResult, ToolSchema};
use crate::error::{BridgeError, Result};
use crate::parser::{AdditionalProperties, ParsedDocument, ParsedOperation, ParsedSchema};

/// Reference prefix resolvable against the document's components table
const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Media types preferred when selecting a request-body schema
const PREFERRED_MEDIA_TYPES: [&str; 2] = ["application/json", "application/x-www-form-urlencoded"];

/// Generator options
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Optional prefix applied to every tool name before sanitization
    pub tool_prefix: Option<String>,
}

impl GeneratorOptions {
    pub fn with_tool_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tool_prefix = Some(prefix.into());
        self
    }
}

/// Read-only conversion context threaded through every recursive call, so
/// the pipeline stays stateless and safely reusable across invocations.
struct ConversionContext<'a> {
    schemas: &'a IndexMap<String, ParsedSchema>,
}

/// Generate tool schemas for every operation in the document.
pub fn generate_tool_schemas(document: &ParsedDocument) -> Result<ToolGenerationResult> {
    generate_tool_schemas_with_options(document, &GeneratorOptions::default())
}

/// Generate tool schemas with explicit options.
///
/// Unexpected failures inside the conversion are caught at this boundary
/// and downgraded to an internal error carrying the original message.
pub fn generate_tool_schemas_with_options(
    document: &ParsedDocument,
    options: &GeneratorOptions,
) -> Result<ToolGenerationResult> {
    catch_unwind(AssertUnwindSafe(|| generate_inner(document, options))).unwrap_or_else(|payload| {
        let message = panic_message(payload);
        debug!("tool generation panicked: {}", message);
        Err(BridgeError::internal(message))
    })
}

/// Generate tool schemas from an untyped document value.
///
/// Checks the input shape explicitly before deserializing: it must be a
/// non-null object whose `paths` field is a list.
pub fn generate_tool_schemas_from_value(document: &Value) -> Result<ToolGenerationResult> {
    if !document.is_object() {
        return Err(BridgeError::invalid_input("parsed document must be an object"));
    }
    if !document.get("paths").map(Value::is_array).unwrap_or(false) {
        return Err(BridgeError::invalid_input("parsed document must have a paths list"));
    }

    let parsed: ParsedDocument = serde_json::from_value(document.clone())
        .map_err(|e| BridgeError::invalid_input(format!("malformed parsed document: {}", e)))?;
    generate_tool_schemas(&parsed)
}

fn generate_inner(
    document: &ParsedDocument,
    options: &GeneratorOptions,
) -> Result<ToolGenerationResult> {
    let ctx = ConversionContext {
        schemas: &document.schemas,
    };

    let mut tools = Vec::new();
    let mut by_tag: IndexMap<String, usize> = IndexMap::new();

    for path in &document.paths {
        for operation in &path.operations {
            tools.push(operation_to_tool(operation, &ctx, options));

            match operation.tags.as_deref().filter(|tags| !tags.is_empty()) {
                Some(tags) => {
                    for tag in tags {
                        *by_tag.entry(tag.clone()).or_insert(0) += 1;
                    }
                }
                None => *by_tag.entry("untagged".to_string()).or_insert(0) += 1,
            }
        }
    }

    let summary = GenerationSummary {
        total_tools: tools.len(),
        by_tag,
    };

    Ok(ToolGenerationResult { tools, summary })
}

fn operation_to_tool(
    operation: &ParsedOperation,
    ctx: &ConversionContext,
    options: &GeneratorOptions,
) -> ToolSchema {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    // Parameters claim the unprefixed property slots first
    for param in &operation.parameters {
        let mut node = convert_schema(&param.schema, ctx, &mut Vec::new());
        if let (Some(desc), Some(obj)) = (&param.description, node.as_object_mut()) {
            obj.insert("description".to_string(), json!(desc));
        }
        properties.insert(param.name.clone(), node);
        if param.required && !required.contains(&param.name) {
            required.push(param.name.clone());
        }
    }

    if let Some(body) = &operation.request_body {
        if let Some(body_schema) = select_body_schema(body) {
            let converted = convert_schema(body_schema, ctx, &mut Vec::new());
            merge_body(&converted, body, &mut properties, &mut required);
        }
    }

    let base_name = match &options.tool_prefix {
        Some(prefix) => format!("{}_{}", prefix, operation.operation_id),
        None => operation.operation_id.clone(),
    };

    ToolSchema {
        name: sanitize_tool_name(&base_name),
        description: build_description(operation),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required
        }),
    }
}

/// Pick the request-body schema: `application/json`, then form-urlencoded,
/// then the first media type in insertion order.
fn select_body_schema(body: &crate::parser::ParsedRequestBody) -> Option<&ParsedSchema> {
    for preferred in PREFERRED_MEDIA_TYPES {
        if let Some(entry) = body.content.get(preferred) {
            return Some(&entry.schema);
        }
    }
    body.content.first().map(|(_, entry)| &entry.schema)
}

/// Flatten an object-typed body into the top-level properties, or fall
/// back to a single `body` property for everything else.
fn merge_body(
    converted: &Value,
    body: &crate::parser::ParsedRequestBody,
    properties: &mut Map<String, Value>,
    required: &mut Vec<String>,
) {
    let is_object = converted.get("type").and_then(Value::as_str) == Some("object");
    let body_properties = converted.get("properties").and_then(Value::as_object);

    if let (true, Some(body_properties)) = (is_object, body_properties) {
        // Parameter names always win the unprefixed slot
        let mut renamed: Map<String, Value> = Map::new();
        for (name, prop) in body_properties {
            let key = if properties.contains_key(name) {
                let prefixed = format!("body_{}", name);
                renamed.insert(name.clone(), json!(prefixed.clone()));
                prefixed
            } else {
                name.clone()
            };
            properties.insert(key, prop.clone());
        }

        if body.required {
            if let Some(body_required) = converted.get("required").and_then(Value::as_array) {
                for name in body_required.iter().filter_map(Value::as_str) {
                    let key = renamed
                        .get(name)
                        .and_then(Value::as_str)
                        .unwrap_or(name)
                        .to_string();
                    if !required.contains(&key) {
                        required.push(key);
                    }
                }
            }
        }
    } else {
        let mut node = converted.clone();
        if let (Some(desc), Some(obj)) = (&body.description, node.as_object_mut()) {
            obj.insert("description".to_string(), json!(desc));
        }
        properties.insert("body".to_string(), node);
        if body.required && !required.contains(&"body".to_string()) {
            required.push("body".to_string());
        }
    }
}

/// Reference-aware conversion of a parsed schema into a JSON-Schema node.
///
/// `stack` carries the names of references on the active resolution path;
/// a name that reappears short-circuits to a bounded placeholder instead
/// of recursing forever on self-referential documents.
fn convert_schema(schema: &ParsedSchema, ctx: &ConversionContext, stack: &mut Vec<String>) -> Value {
    if let Some(reference) = &schema.reference {
        let name = reference.strip_prefix(SCHEMA_REF_PREFIX).unwrap_or("");
        match ctx.schemas.get(name) {
            Some(resolved) => {
                if stack.iter().any(|seen| seen == name) {
                    // Cycle: substitute a bounded placeholder
                    return json!({"type": "object"});
                }
                stack.push(name.to_string());
                let converted = convert_schema(resolved, ctx, stack);
                stack.pop();
                return converted;
            }
            None => {
                debug!("unresolved schema reference: {}", reference);
                return json!({"type": "object"});
            }
        }
    }

    // allOf merges into a single object schema and replaces the whole node
    if let Some(all_of) = &schema.all_of {
        let mut merged_properties = Map::new();
        let mut merged_required: Vec<Value> = Vec::new();
        for member in all_of {
            let converted = convert_schema(member, ctx, stack);
            if let Some(props) = converted.get("properties").and_then(Value::as_object) {
                for (name, prop) in props {
                    merged_properties.insert(name.clone(), prop.clone());
                }
            }
            if let Some(names) = converted.get("required").and_then(Value::as_array) {
                merged_required.extend(names.iter().cloned());
            }
        }
        return json!({
            "type": "object",
            "properties": merged_properties,
            "required": merged_required
        });
    }

    let mut node = Map::new();

    if let Some(schema_type) = &schema.schema_type {
        node.insert("type".to_string(), json!(schema_type));
    }
    if let Some(format) = &schema.format {
        node.insert("format".to_string(), json!(format));
    }
    if let Some(description) = &schema.description {
        node.insert("description".to_string(), json!(description));
    }
    if let Some(title) = &schema.title {
        node.insert("title".to_string(), json!(title));
    }
    if let Some(enum_values) = &schema.enum_values {
        node.insert("enum".to_string(), json!(enum_values));
    }
    if let Some(default) = &schema.default {
        node.insert("default".to_string(), default.clone());
    }
    if let Some(example) = &schema.example {
        node.insert("example".to_string(), example.clone());
    }
    if let Some(nullable) = schema.nullable {
        node.insert("nullable".to_string(), json!(nullable));
    }
    if let Some(minimum) = schema.minimum {
        node.insert("minimum".to_string(), json!(minimum));
    }
    if let Some(maximum) = schema.maximum {
        node.insert("maximum".to_string(), json!(maximum));
    }
    if let Some(min_length) = schema.min_length {
        node.insert("minLength".to_string(), json!(min_length));
    }
    if let Some(max_length) = schema.max_length {
        node.insert("maxLength".to_string(), json!(max_length));
    }
    if let Some(pattern) = &schema.pattern {
        node.insert("pattern".to_string(), json!(pattern));
    }

    if let Some(properties) = &schema.properties {
        let converted: Map<String, Value> = properties
            .iter()
            .map(|(name, prop)| (name.clone(), convert_schema(prop, ctx, stack)))
            .collect();
        node.insert("properties".to_string(), Value::Object(converted));
    }
    if let Some(required) = &schema.required {
        node.insert("required".to_string(), json!(required));
    }
    if let Some(items) = &schema.items {
        node.insert("items".to_string(), convert_schema(items, ctx, stack));
    }
    if let Some(one_of) = &schema.one_of {
        let converted: Vec<Value> = one_of.iter().map(|s| convert_schema(s, ctx, stack)).collect();
        node.insert("oneOf".to_string(), json!(converted));
    }
    if let Some(any_of) = &schema.any_of {
        let converted: Vec<Value> = any_of.iter().map(|s| convert_schema(s, ctx, stack)).collect();
        node.insert("anyOf".to_string(), json!(converted));
    }
    match &schema.additional_properties {
        Some(AdditionalProperties::Bool(allowed)) => {
            node.insert("additionalProperties".to_string(), json!(allowed));
        }
        Some(AdditionalProperties::Schema(nested)) => {
            node.insert(
                "additionalProperties".to_string(),
                convert_schema(nested, ctx, stack),
            );
        }
        None => {}
    }

    Value::Object(node)
}

/// Join whatever descriptive parts the operation carries; fall back to
/// `Execute <operation_id>` when it carries none.
fn build_description(operation: &ParsedOperation) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(summary) = &operation.summary {
        parts.push(summary.clone());
    }
    if let Some(description) = &operation.description {
        if operation.summary.as_deref() != Some(description.as_str()) {
            parts.push(description.clone());
        }
    }
    if operation.deprecated == Some(true) {
        parts.push("[DEPRECATED]".to_string());
    }

    if parts.is_empty() {
        return format!("Execute {}", operation.operation_id);
    }

    parts.push(format!("[{}]", operation.method.to_uppercase()));
    parts.join(" ")
}

/// Sanitize a tool name: replace characters outside `[A-Za-z0-9_-]` with
/// `_`, collapse runs of `_`, strip leading/trailing `_`, lower-case, and
/// cap at 64 characters. Idempotent.
pub fn sanitize_tool_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_underscore = false;
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            c.to_ascii_lowercase()
        } else {
            '_'
        };
        if c == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('_');
    let truncated: String = trimmed.chars().take(64).collect();
    // Truncation can expose a trailing underscore; strip it so the
    // function stays idempotent
    truncated.trim_end_matches('_').to_string()
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure during tool generation".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document_value;
    use serde_json::json;

    fn parse(doc: Value) -> ParsedDocument {
        parse_document_value(&doc).expect("document should parse")
    }

    fn single_tool(doc: Value) -> ToolSchema {
        let result = generate_tool_schemas(&parse(doc)).expect("generation should succeed");
        assert_eq!(result.tools.len(), 1);
        result.tools.into_iter().next().unwrap()
    }

    #[test]
    fn test_sanitize_tool_name() {
        assert_eq!(sanitize_tool_name("Tool With Spaces"), "tool_with_spaces");
        assert_eq!(sanitize_tool_name("tool@#$special"), "tool_special");
        assert_eq!(sanitize_tool_name("__already__clean__"), "already_clean");
        assert_eq!(sanitize_tool_name("keep-dashes"), "keep-dashes");
    }

    #[test]
    fn test_sanitize_tool_name_idempotent() {
        for input in [
            "Tool With Spaces",
            "tool@#$special",
            "UPPER_case",
            "x".repeat(100).as_str(),
            "a_b_c",
            &format!("{}_tail", "y".repeat(62)),
        ] {
            let once = sanitize_tool_name(input);
            assert_eq!(sanitize_tool_name(&once), once, "not idempotent for {:?}", input);
            assert!(once.len() <= 64);
            assert!(!once.starts_with('_') && !once.ends_with('_'));
            assert!(!once.contains("__"));
        }
    }

    #[test]
    fn test_parameters_become_properties() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/users/{id}": {
                    "get": {
                        "operationId": "getUser",
                        "summary": "Get one user",
                        "parameters": [
                            {"name": "id", "in": "path", "schema": {"type": "string"},
                             "description": "User id"},
                            {"name": "expand", "in": "query", "schema": {"type": "boolean"}}
                        ],
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        assert_eq!(tool.name, "getuser");
        assert_eq!(tool.input_schema["type"], "object");
        assert_eq!(tool.input_schema["properties"]["id"]["type"], "string");
        assert_eq!(tool.input_schema["properties"]["id"]["description"], "User id");
        assert_eq!(tool.input_schema["required"], json!(["id"]));
        assert_eq!(tool.description, "Get one user [GET]");
    }

    #[test]
    fn test_object_body_flattens() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/users": {
                    "post": {
                        "operationId": "createUser",
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["name"],
                                        "properties": {
                                            "name": {"type": "string"},
                                            "age": {"type": "integer"}
                                        }
                                    }
                                }
                            }
                        },
                        "responses": {"201": {"description": "created"}}
                    }
                }
            }
        }));

        let props = tool.input_schema["properties"].as_object().unwrap();
        assert!(props.contains_key("name"));
        assert!(props.contains_key("age"));
        assert!(!props.contains_key("body"));
        assert_eq!(tool.input_schema["required"], json!(["name"]));
    }

    #[test]
    fn test_body_collision_gets_prefixed() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/things/{name}": {
                    "put": {
                        "operationId": "renameThing",
                        "parameters": [
                            {"name": "name", "in": "path", "schema": {"type": "string"}}
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "required": ["name"],
                                        "properties": {"name": {"type": "string"}}
                                    }
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        let props = tool.input_schema["properties"].as_object().unwrap();
        // The parameter keeps the unprefixed slot
        assert!(props.contains_key("name"));
        assert!(props.contains_key("body_name"));
        assert_eq!(tool.input_schema["required"], json!(["name", "body_name"]));
    }

    #[test]
    fn test_non_object_body_wraps_in_body_property() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/batch": {
                    "post": {
                        "operationId": "batchCreate",
                        "requestBody": {
                            "required": true,
                            "description": "Items to create",
                            "content": {
                                "application/json": {
                                    "schema": {"type": "array", "items": {"type": "string"}}
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        let body = &tool.input_schema["properties"]["body"];
        assert_eq!(body["type"], "array");
        assert_eq!(body["description"], "Items to create");
        assert_eq!(tool.input_schema["required"], json!(["body"]));
    }

    #[test]
    fn test_media_type_preference_order() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/upload": {
                    "post": {
                        "operationId": "upload",
                        "requestBody": {
                            "content": {
                                "text/plain": {"schema": {"type": "string"}},
                                "application/json": {
                                    "schema": {"type": "object", "properties": {"data": {"type": "string"}}}
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        // application/json wins over the earlier text/plain entry
        assert!(tool.input_schema["properties"].as_object().unwrap().contains_key("data"));
    }

    #[test]
    fn test_ref_inlines_component_schema() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Pet"}
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "owner": {"$ref": "#/components/schemas/Owner"}
                        }
                    },
                    "Owner": {
                        "type": "object",
                        "properties": {"email": {"type": "string", "format": "email"}}
                    }
                }
            }
        }));

        let props = tool.input_schema["properties"].as_object().unwrap();
        // Nested reference resolved through two levels
        assert_eq!(props["owner"]["properties"]["email"]["format"], "email");
    }

    #[test]
    fn test_unresolved_ref_degrades_to_object() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/x": {
                    "post": {
                        "operationId": "mystery",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Missing"}
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        // Degrades to a bare object schema, wrapped as the body property
        // since it has no properties to flatten
        assert_eq!(tool.input_schema["properties"]["body"], json!({"type": "object"}));
    }

    #[test]
    fn test_cyclic_refs_terminate() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/nodes": {
                    "post": {
                        "operationId": "createNode",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Node"}
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            },
            "components": {
                "schemas": {
                    "Node": {
                        "type": "object",
                        "properties": {
                            "value": {"type": "string"},
                            "next": {"$ref": "#/components/schemas/Node"}
                        }
                    }
                }
            }
        }));

        let props = tool.input_schema["properties"].as_object().unwrap();
        assert_eq!(props["value"]["type"], "string");
        // The self-reference collapses to a bounded placeholder
        assert_eq!(props["next"], json!({"type": "object"}));
    }

    #[test]
    fn test_all_of_merges_disjoint_objects() {
        let tool = single_tool(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/dogs": {
                    "post": {
                        "operationId": "createDog",
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "allOf": [
                                            {"type": "object", "required": ["name"],
                                             "properties": {"name": {"type": "string"}}},
                                            {"type": "object", "required": ["breed"],
                                             "properties": {"breed": {"type": "string"}}}
                                        ]
                                    }
                                }
                            }
                        },
                        "responses": {"200": {"description": "ok"}}
                    }
                }
            }
        }));

        let props = tool.input_schema["properties"].as_object().unwrap();
        assert!(props.contains_key("name"));
        assert!(props.contains_key("breed"));
        assert_eq!(tool.input_schema["required"], json!(["name", "breed"]));
    }

    #[test]
    fn test_all_of_later_member_wins() {
        let doc = parse(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {}
        }));
        let ctx = ConversionContext { schemas: &doc.schemas };
        let schema = crate::parser::parse_schema(&json!({
            "allOf": [
                {"type": "object", "properties": {"id": {"type": "string"}}},
                {"type": "object", "properties": {"id": {"type": "integer"}}}
            ]
        }));
        let merged = convert_schema(&schema, &ctx, &mut Vec::new());
        assert_eq!(merged["properties"]["id"]["type"], "integer");
    }

    #[test]
    fn test_one_of_kept_as_list() {
        let doc = parse(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {}
        }));
        let ctx = ConversionContext { schemas: &doc.schemas };
        let schema = crate::parser::parse_schema(&json!({
            "oneOf": [{"type": "string"}, {"type": "integer"}]
        }));
        let converted = convert_schema(&schema, &ctx, &mut Vec::new());
        assert_eq!(converted["oneOf"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_summary_counts_and_untagged_bucket() {
        let result = generate_tool_schemas(&parse(json!({
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/a": {
                    "get": {"operationId": "a", "tags": ["users", "admin"],
                            "responses": {"200": {"description": "ok"}}},
                    "post": {"operationId": "b", "responses": {"200": {"description": "ok"}}}
                },
                "/b": {
                    "get": {"operationId": "c", "tags": ["users"],
                            "responses": {"200": {"description": "ok"}}}
                }
            }
        })))
        .unwrap();

        assert_eq!(result.summary.total_tools, 3);
        assert_eq!(result.summary.by_tag["users"], 2);
        assert_eq!(result.summary.by_tag["admin"], 1);
        assert_eq!(result.summary.by_tag["untagged"], 1);
        // Multi-tag operations count once per tag, so the sum exceeds
        // the tool count
        let tag_sum: usize = result.summary.by_tag.values().sum();
        assert!(tag_sum > result.summary.total_tools);
    }

    #[test]
    fn test_description_markers() {
        let result = generate_tool_schemas(&parse(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/old": {
                    "delete": {
                        "operationId": "removeOld",
                        "summary": "Remove",
                        "description": "Removes the thing",
                        "deprecated": true,
                        "responses": {"204": {"description": "gone"}}
                    }
                },
                "/bare": {
                    "get": {"operationId": "bare", "responses": {"200": {"description": "ok"}}}
                }
            }
        })))
        .unwrap();

        assert_eq!(result.tools[0].description, "Remove Removes the thing [DEPRECATED] [DELETE]");
        assert_eq!(result.tools[1].description, "Execute bare");
    }

    #[test]
    fn test_precondition_checks_on_value_input() {
        let err = generate_tool_schemas_from_value(&json!(null)).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);

        let err = generate_tool_schemas_from_value(&json!({"paths": {}})).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_generation_from_serialized_document() {
        let doc = parse(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/a": {"get": {"operationId": "a", "responses": {"200": {"description": "ok"}}}}
            }
        }));
        let value = serde_json::to_value(&doc).unwrap();
        let result = generate_tool_schemas_from_value(&value).unwrap();
        assert_eq!(result.summary.total_tools, 1);
    }

    #[test]
    fn test_tool_prefix_applied_before_sanitization() {
        let doc = parse(json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/a": {"get": {"operationId": "GetA", "responses": {"200": {"description": "ok"}}}}
            }
        }));
        let options = GeneratorOptions::default().with_tool_prefix("petstore");
        let result = generate_tool_schemas_with_options(&doc, &options).unwrap();
        assert_eq!(result.tools[0].name, "petstore_geta");
    }
}
