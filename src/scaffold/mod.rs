//! Project scaffold generation
//!
//! Emits source-file scaffolds for a generated tool set in one of two
//! target languages. Pure text assembly over the parsed document and the
//! tool list; nothing here is executed or semantically validated.

mod python;
mod typescript;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::generator::ToolSchema;
use crate::parser::ParsedDocument;

/// Supported scaffold targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaffoldTarget {
    TypeScript,
    Python,
}

impl ScaffoldTarget {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Some(ScaffoldTarget::TypeScript),
            "python" | "py" => Some(ScaffoldTarget::Python),
            _ => None,
        }
    }
}

/// One emitted scaffold file: a relative path plus its text content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

/// Generate the scaffold file set for a target language.
pub fn generate_scaffold(
    document: &ParsedDocument,
    tools: &[ToolSchema],
    target: ScaffoldTarget,
    project_name: Option<&str>,
) -> Result<Vec<ScaffoldFile>> {
    let name = normalize_project_name(project_name.unwrap_or(&document.info.title));
    if name.is_empty() {
        return Err(BridgeError::invalid_input("project name resolves to an empty string"));
    }

    let files = match target {
        ScaffoldTarget::TypeScript => typescript::render(document, tools, &name),
        ScaffoldTarget::Python => python::render(document, tools, &name),
    };
    Ok(files)
}

/// Lower-cased, dash-separated project name usable in manifests and paths
fn normalize_project_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_dash = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !out.is_empty() {
            out.push('-');
            last_was_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}
