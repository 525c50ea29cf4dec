//! Tool schema output types

use indexmap::IndexMap;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// One callable action derived from an OpenAPI operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Sanitized tool name (unique within one generation run in practice,
    /// since operation ids are unique within a document)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the tool's input arguments; always `type: "object"`
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolSchema {
    /// Validate a candidate argument object against the input schema
    pub fn validate_arguments(&self, arguments: &Value) -> Result<()> {
        let schema = JSONSchema::compile(&self.input_schema).map_err(|e| {
            BridgeError::internal(format!(
                "failed to compile schema for tool '{}': {}",
                self.name, e
            ))
        })?;

        let result = match schema.validate(arguments) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let messages: Vec<String> = errors.map(|e| format!("  - {}", e)).collect();
                Err(BridgeError::invalid_input(format!(
                    "invalid arguments for tool '{}': \n{}",
                    self.name,
                    messages.join("\n")
                )))
            }
        };
        result
    }
}

/// Aggregate statistics over one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub total_tools: usize,
    /// Count of operations per tag; operations without tags count under
    /// the literal tag `untagged`, operations with several tags count
    /// once per tag, so the column sum can exceed `total_tools`.
    pub by_tag: IndexMap<String, usize>,
}

/// Result of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolGenerationResult {
    pub tools: Vec<ToolSchema>,
    pub summary: GenerationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_serializes_with_camel_case_input_schema() {
        let tool = ToolSchema {
            name: "get_users".to_string(),
            description: "[GET]".to_string(),
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        };
        let wire = serde_json::to_value(&tool).unwrap();
        assert!(wire.get("inputSchema").is_some());
        assert!(wire.get("input_schema").is_none());
    }

    #[test]
    fn test_validate_arguments_accepts_conforming_object() {
        let tool = ToolSchema {
            name: "create_user".to_string(),
            description: "[POST]".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"]
            }),
        };
        assert!(tool.validate_arguments(&json!({"name": "ada"})).is_ok());
        assert!(tool.validate_arguments(&json!({})).is_err());
    }
}
