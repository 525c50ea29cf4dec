//! Document parser
//!
//! Walks a raw OpenAPI 3.x document (info, servers, paths, components) and
//! produces the normalized [`ParsedDocument`]. The walk itself never fails:
//! malformed nested data degrades to empty mappings and lists. The version
//! gate and the JSON syntax check live in the public entry points.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use super::schema::parse_schema;
use super::types::{
    DocumentInfo, ParameterLocation, ParsedDocument, ParsedMediaType, ParsedOperation,
    ParsedParameter, ParsedPath, ParsedRequestBody, ParsedResponse, ParsedSchema,
    ParsedSecurityScheme, ServerEntry, ServerVariable,
};
use crate::error::{BridgeError, Result};

/// Fixed method order for operations within a path. Consumers depend on
/// this ordering being stable and independent of document key order.
pub const METHOD_ORDER: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Declared version string of a document, if any
pub fn detect_version(doc: &Value) -> Option<&str> {
    doc.get("openapi").and_then(Value::as_str)
}

/// A document is accepted only when its `openapi` field is a string
/// starting with `"3."`; Swagger 2.0 and missing versions are rejected.
pub fn is_supported_version(doc: &Value) -> bool {
    detect_version(doc).map(|v| v.starts_with("3.")).unwrap_or(false)
}

/// Parse raw JSON document text into the normalized model.
///
/// Syntactically invalid JSON yields `PARSE_ERROR`; an unsupported or
/// missing version yields `INVALID_INPUT` reporting the detected version.
pub fn parse_document_text(text: &str) -> Result<ParsedDocument> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| BridgeError::parse(format!("invalid JSON: {}", e)))?;
    parse_document_value(&doc)
}

/// Parse an already-deserialized document into the normalized model.
pub fn parse_document_value(doc: &Value) -> Result<ParsedDocument> {
    if !doc.is_object() {
        return Err(BridgeError::invalid_input("document must be a JSON object"));
    }
    if !is_supported_version(doc) {
        let detected = detect_version(doc).unwrap_or("unknown");
        let mut details = Map::new();
        details.insert("detected_version".to_string(), Value::String(detected.to_string()));
        return Err(BridgeError::invalid_input_with_details(
            format!("unsupported OpenAPI version: {}", detected),
            details,
        ));
    }
    Ok(parse_spec(doc))
}

/// Walk a version-checked document. Never fails; degrades instead.
pub fn parse_spec(doc: &Value) -> ParsedDocument {
    let openapi_version = detect_version(doc).unwrap_or_default().to_string();

    let info = parse_info(doc.get("info"));
    let servers = parse_servers(doc.get("servers"));
    let paths = parse_paths(doc.get("paths"));

    let components = doc.get("components");
    let schemas = parse_component_schemas(components.and_then(|c| c.get("schemas")));
    let security_schemes =
        parse_security_schemes(components.and_then(|c| c.get("securitySchemes")));

    ParsedDocument {
        openapi_version,
        info,
        servers,
        paths,
        schemas,
        security_schemes,
    }
}

/// Deterministic operation id for operations missing `operationId`:
/// strip the leading slash and path-variable braces, collapse every run of
/// non-alphanumeric characters into one underscore, trim underscores,
/// lower-case, and prefix with the method.
pub fn derive_operation_id(method: &str, path: &str) -> String {
    let stripped: String = path
        .trim_start_matches('/')
        .chars()
        .filter(|c| *c != '{' && *c != '}')
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut last_was_separator = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }
    let slug = slug.trim_matches('_');

    format!("{}_{}", method.to_lowercase(), slug)
}

fn parse_info(node: Option<&Value>) -> DocumentInfo {
    DocumentInfo {
        title: str_field(node, "title").unwrap_or_default(),
        version: str_field(node, "version").unwrap_or_default(),
        description: str_field(node, "description"),
    }
}

fn parse_servers(node: Option<&Value>) -> Vec<ServerEntry> {
    let servers = match node.and_then(Value::as_array) {
        Some(servers) => servers,
        None => return Vec::new(),
    };

    servers
        .iter()
        .filter_map(|server| {
            let url = server.get("url").and_then(Value::as_str)?.to_string();
            let variables = server.get("variables").and_then(Value::as_object).map(|vars| {
                vars.iter()
                    .map(|(name, var)| {
                        (
                            name.clone(),
                            ServerVariable {
                                default: var.get("default").and_then(Value::as_str).map(str::to_string),
                                enum_values: var.get("enum").and_then(Value::as_array).map(|vals| {
                                    vals.iter().filter_map(Value::as_str).map(str::to_string).collect()
                                }),
                                description: var
                                    .get("description")
                                    .and_then(Value::as_str)
                                    .map(str::to_string),
                            },
                        )
                    })
                    .collect::<IndexMap<_, _>>()
            });
            Some(ServerEntry {
                url,
                description: server.get("description").and_then(Value::as_str).map(str::to_string),
                variables,
            })
        })
        .collect()
}

fn parse_paths(node: Option<&Value>) -> Vec<ParsedPath> {
    let paths = match node.and_then(Value::as_object) {
        Some(paths) => paths,
        None => return Vec::new(),
    };

    paths
        .iter()
        .filter_map(|(path, item)| {
            let item = item.as_object()?;
            let path_level_params = item.get("parameters").and_then(Value::as_array);

            let mut operations = Vec::new();
            for method in METHOD_ORDER {
                if let Some(op) = item.get(method) {
                    if op.is_object() {
                        operations.push(parse_operation(path, method, op, path_level_params));
                    }
                }
            }

            Some(ParsedPath {
                path: path.clone(),
                operations,
            })
        })
        .collect()
}

fn parse_operation(
    path: &str,
    method: &str,
    op: &Value,
    path_level_params: Option<&Vec<Value>>,
) -> ParsedOperation {
    let operation_id = op
        .get("operationId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| derive_operation_id(method, path));

    // Path-level parameters come first in the merged list
    let mut raw_params: Vec<&Value> = Vec::new();
    if let Some(params) = path_level_params {
        raw_params.extend(params.iter());
    }
    if let Some(params) = op.get("parameters").and_then(Value::as_array) {
        raw_params.extend(params.iter());
    }
    let parameters = raw_params.iter().filter_map(|p| parse_parameter(p)).collect();

    ParsedOperation {
        operation_id,
        method: method.to_uppercase(),
        summary: str_field(Some(op), "summary"),
        description: str_field(Some(op), "description"),
        tags: op.get("tags").and_then(Value::as_array).map(|tags| {
            tags.iter().filter_map(Value::as_str).map(str::to_string).collect()
        }),
        parameters,
        request_body: op.get("requestBody").and_then(parse_request_body),
        responses: parse_responses(op.get("responses")),
        security: op
            .get("security")
            .and_then(|security| serde_json::from_value(security.clone()).ok()),
        deprecated: op.get("deprecated").and_then(Value::as_bool),
    }
}

/// Only inline parameter objects are parsed; a parameter defined as an
/// internal reference is dropped.
fn parse_parameter(param: &Value) -> Option<ParsedParameter> {
    let obj = param.as_object()?;
    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        debug!("dropping reference-defined parameter: {}", reference);
        return None;
    }

    let name = obj.get("name").and_then(Value::as_str)?.to_string();
    let location = ParameterLocation::from_str(obj.get("in").and_then(Value::as_str)?)?;

    // Path parameters are intrinsically required, whatever the document says
    let required = match location {
        ParameterLocation::Path => true,
        _ => obj.get("required").and_then(Value::as_bool).unwrap_or(false),
    };

    Some(ParsedParameter {
        name,
        location,
        description: obj.get("description").and_then(Value::as_str).map(str::to_string),
        required,
        deprecated: obj.get("deprecated").and_then(Value::as_bool),
        schema: obj.get("schema").map(parse_schema).unwrap_or_default(),
    })
}

fn parse_request_body(body: &Value) -> Option<ParsedRequestBody> {
    let obj = body.as_object()?;
    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        debug!("dropping reference-defined request body: {}", reference);
        return None;
    }

    // Missing content degrades to an empty mapping
    let content = obj
        .get("content")
        .and_then(Value::as_object)
        .map(|content| {
            content
                .iter()
                .map(|(media_type, entry)| {
                    (
                        media_type.clone(),
                        ParsedMediaType {
                            schema: entry.get("schema").map(parse_schema).unwrap_or_default(),
                        },
                    )
                })
                .collect::<IndexMap<_, _>>()
        })
        .unwrap_or_default();

    Some(ParsedRequestBody {
        description: obj.get("description").and_then(Value::as_str).map(str::to_string),
        required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
        content,
    })
}

fn parse_responses(node: Option<&Value>) -> Vec<ParsedResponse> {
    let responses = match node.and_then(Value::as_object) {
        Some(responses) => responses,
        None => return Vec::new(),
    };

    responses
        .iter()
        .filter_map(|(status, response)| {
            let obj = response.as_object()?;
            if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
                debug!("dropping reference-defined response {}: {}", status, reference);
                return None;
            }

            let content = obj.get("content").and_then(Value::as_object).map(|content| {
                content
                    .iter()
                    .map(|(media_type, entry)| {
                        (
                            media_type.clone(),
                            entry.get("schema").map(parse_schema).unwrap_or_default(),
                        )
                    })
                    .collect::<IndexMap<String, ParsedSchema>>()
            });

            Some(ParsedResponse {
                status: status.clone(),
                description: obj
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                content,
            })
        })
        .collect()
}

fn parse_component_schemas(node: Option<&Value>) -> IndexMap<String, ParsedSchema> {
    node.and_then(Value::as_object)
        .map(|schemas| {
            schemas
                .iter()
                .map(|(name, schema)| (name.clone(), parse_schema(schema)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_security_schemes(node: Option<&Value>) -> IndexMap<String, ParsedSecurityScheme> {
    let schemes = match node.and_then(Value::as_object) {
        Some(schemes) => schemes,
        None => return IndexMap::new(),
    };

    schemes
        .iter()
        .filter_map(|(name, scheme)| {
            match serde_json::from_value::<ParsedSecurityScheme>(scheme.clone()) {
                Ok(parsed) => Some((name.clone(), parsed)),
                Err(e) => {
                    debug!("dropping security scheme {}: {}", name, e);
                    None
                }
            }
        })
        .collect()
}

fn str_field(node: Option<&Value>, key: &str) -> Option<String> {
    node.and_then(|n| n.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn petstore() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "servers": [
                {"url": "https://api.example.com/{basePath}", "variables": {
                    "basePath": {"default": "v2", "enum": ["v1", "v2"]}
                }}
            ],
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": false, "schema": {"type": "string"}}
                    ],
                    "delete": {
                        "responses": {"204": {"description": "Deleted"}}
                    },
                    "get": {
                        "operationId": "showPetById",
                        "parameters": [
                            {"name": "verbose", "in": "query", "schema": {"type": "boolean"}}
                        ],
                        "responses": {"200": {"description": "A pet"}}
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                },
                "securitySchemes": {
                    "api_key": {"type": "apiKey", "name": "X-Api-Key", "in": "header"},
                    "broken": {"type": "mutualTLS"}
                }
            }
        })
    }

    #[test]
    fn test_derive_operation_id() {
        assert_eq!(derive_operation_id("GET", "/users"), "get_users");
        assert_eq!(derive_operation_id("POST", "/users/{id}"), "post_users_id");
        assert_eq!(
            derive_operation_id("DELETE", "/users/{userId}/posts/{postId}"),
            "delete_users_userid_posts_postid"
        );
        assert_eq!(derive_operation_id("GET", "/v1/key-value//pairs"), "get_v1_key_value_pairs");
    }

    #[test]
    fn test_version_gate() {
        assert!(is_supported_version(&json!({"openapi": "3.0.0"})));
        assert!(is_supported_version(&json!({"openapi": "3.1.0"})));
        assert!(!is_supported_version(&json!({"swagger": "2.0"})));
        assert!(!is_supported_version(&json!({"openapi": 3.1})));
        assert!(!is_supported_version(&json!({})));
    }

    #[test]
    fn test_parse_error_on_invalid_json() {
        let err = parse_document_text("{not json").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ParseError);
    }

    #[test]
    fn test_invalid_input_reports_detected_version() {
        let err = parse_document_value(&json!({"swagger": "2.0"})).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);
        // Missing openapi field reports the literal "unknown"
        let details = err.details();
        assert_eq!(details.get("detected_version"), Some(&json!("unknown")));
    }

    #[test]
    fn test_method_order_is_fixed() {
        // delete appears before get in the document; the parsed order is
        // the fixed method order, not document order
        let doc = parse_spec(&petstore());
        let methods: Vec<&str> = doc.paths[0]
            .operations
            .iter()
            .map(|op| op.method.as_str())
            .collect();
        assert_eq!(methods, vec!["GET", "DELETE"]);
    }

    #[test]
    fn test_path_level_parameters_merge_first() {
        let doc = parse_spec(&petstore());
        let get = &doc.paths[0].operations[0];
        assert_eq!(get.operation_id, "showPetById");
        let names: Vec<&str> = get.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["petId", "verbose"]);
    }

    #[test]
    fn test_path_parameter_forced_required() {
        // Document says required: false; path parameters are still required
        let doc = parse_spec(&petstore());
        let pet_id = &doc.paths[0].operations[0].parameters[0];
        assert_eq!(pet_id.location, ParameterLocation::Path);
        assert!(pet_id.required);
    }

    #[test]
    fn test_missing_operation_id_is_derived() {
        let doc = parse_spec(&petstore());
        let delete = &doc.paths[0].operations[1];
        assert_eq!(delete.operation_id, "delete_pets_petid");
    }

    #[test]
    fn test_reference_parameters_dropped() {
        let doc = parse_spec(&json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/a": {
                    "get": {
                        "parameters": [
                            {"$ref": "#/components/parameters/Offset"},
                            {"name": "limit", "in": "query", "schema": {"type": "integer"}}
                        ],
                        "responses": {}
                    }
                }
            }
        }));
        let params = &doc.paths[0].operations[0].parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "limit");
    }

    #[test]
    fn test_components_and_security_schemes() {
        let doc = parse_spec(&petstore());
        assert!(doc.schemas.contains_key("Pet"));
        assert_eq!(doc.security_schemes.len(), 1);
        match &doc.security_schemes["api_key"] {
            ParsedSecurityScheme::ApiKey { name, location, .. } => {
                assert_eq!(name, "X-Api-Key");
                assert_eq!(location, "header");
            }
            other => panic!("expected apiKey scheme, got {:?}", other),
        }
    }

    #[test]
    fn test_server_variables_preserved() {
        let doc = parse_spec(&petstore());
        let vars = doc.servers[0].variables.as_ref().unwrap();
        assert_eq!(vars["basePath"].default.as_deref(), Some("v2"));
        assert_eq!(vars["basePath"].enum_values.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_nested_data_degrades() {
        let doc = parse_spec(&json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {
                "/a": {"post": {"requestBody": {"required": true}, "responses": null}}
            }
        }));
        let op = &doc.paths[0].operations[0];
        assert!(op.request_body.as_ref().unwrap().content.is_empty());
        assert!(op.responses.is_empty());
    }
}
