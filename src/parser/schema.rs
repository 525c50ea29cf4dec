//! Schema normalizer
//!
//! Converts one raw OpenAPI schema node (or reference object) into a
//! [`ParsedSchema`]. A `$ref` node is kept as a leaf pointer and never
//! resolved here; resolution against the components table happens during
//! tool-schema generation. Cyclic documents are assumed to have been
//! bounded by the upstream dereferencing step.

use indexmap::IndexMap;
use serde_json::Value;

use super::types::{AdditionalProperties, ParsedSchema};

/// Normalize a raw schema node into the internal representation.
///
/// Every recognized attribute is copied only when present; absence of an
/// input key means absence of the output field. A `type` array (OpenAPI
/// 3.1 nullable-union style) keeps only its first element.
pub fn parse_schema(node: &Value) -> ParsedSchema {
    let obj = match node.as_object() {
        Some(obj) => obj,
        // Non-object schema nodes carry nothing we can normalize
        None => return ParsedSchema::default(),
    };

    if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        return ParsedSchema::from_reference(reference);
    }

    let mut schema = ParsedSchema::default();

    schema.schema_type = match obj.get("type") {
        Some(Value::String(t)) => Some(t.clone()),
        // First element only; full union support is out of scope
        Some(Value::Array(types)) => types.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    schema.format = obj.get("format").and_then(Value::as_str).map(str::to_string);
    schema.description = obj.get("description").and_then(Value::as_str).map(str::to_string);
    schema.title = obj.get("title").and_then(Value::as_str).map(str::to_string);
    schema.enum_values = obj.get("enum").and_then(Value::as_array).cloned();
    schema.default = obj.get("default").cloned();
    schema.example = obj.get("example").cloned();
    schema.nullable = obj.get("nullable").and_then(Value::as_bool);
    schema.minimum = obj.get("minimum").and_then(Value::as_f64);
    schema.maximum = obj.get("maximum").and_then(Value::as_f64);
    schema.min_length = obj.get("minLength").and_then(Value::as_u64);
    schema.max_length = obj.get("maxLength").and_then(Value::as_u64);
    schema.pattern = obj.get("pattern").and_then(Value::as_str).map(str::to_string);

    schema.required = obj.get("required").and_then(Value::as_array).map(|names| {
        names
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    schema.properties = obj.get("properties").and_then(Value::as_object).map(|props| {
        props
            .iter()
            .map(|(name, prop)| (name.clone(), parse_schema(prop)))
            .collect::<IndexMap<_, _>>()
    });

    schema.items = obj.get("items").map(|items| Box::new(parse_schema(items)));

    schema.one_of = parse_schema_list(obj.get("oneOf"));
    schema.any_of = parse_schema_list(obj.get("anyOf"));
    schema.all_of = parse_schema_list(obj.get("allOf"));

    schema.additional_properties = match obj.get("additionalProperties") {
        Some(Value::Bool(allowed)) => Some(AdditionalProperties::Bool(*allowed)),
        Some(nested @ Value::Object(_)) => {
            Some(AdditionalProperties::Schema(Box::new(parse_schema(nested))))
        }
        _ => None,
    };

    schema
}

fn parse_schema_list(node: Option<&Value>) -> Option<Vec<ParsedSchema>> {
    node.and_then(Value::as_array)
        .map(|members| members.iter().map(parse_schema).collect())
}
