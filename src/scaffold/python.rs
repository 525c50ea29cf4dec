//! Python project scaffold

use crate::generator::ToolSchema;
use crate::parser::ParsedDocument;

use super::ScaffoldFile;

pub(super) fn render(
    document: &ParsedDocument,
    tools: &[ToolSchema],
    name: &str,
) -> Vec<ScaffoldFile> {
    vec![
        ScaffoldFile {
            path: "pyproject.toml".to_string(),
            content: pyproject(document, name),
        },
        ScaffoldFile {
            path: "server.py".to_string(),
            content: server_py(document, tools, name),
        },
        ScaffoldFile {
            path: "README.md".to_string(),
            content: readme(document, tools, name),
        },
    ]
}

fn pyproject(document: &ParsedDocument, name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
version = "0.1.0"
description = "Tool server generated from {title}"
requires-python = ">=3.10"
dependencies = [
    "mcp>=1.0.0",
    "httpx>=0.27",
]
"#,
        name = name,
        title = document.info.title,
    )
}

fn server_py(document: &ParsedDocument, tools: &[ToolSchema], name: &str) -> String {
    let tool_json = serde_json::to_string_pretty(tools).unwrap_or_else(|_| "[]".to_string());
    let base_url = document
        .servers
        .first()
        .map(|s| s.url.as_str())
        .unwrap_or("http://localhost");

    format!(
        r#""""Generated from {title} v{version}."""

import os

from mcp.server import Server
from mcp.server.stdio import stdio_server

BASE_URL = os.environ.get("API_BASE_URL", "{base_url}")

TOOLS = {tool_json}

server = Server("{name}")


@server.list_tools()
async def list_tools():
    return TOOLS


@server.call_tool()
async def call_tool(tool_name, arguments):
    tool = next((t for t in TOOLS if t["name"] == tool_name), None)
    if tool is None:
        raise ValueError(f"Unknown tool: {{tool_name}}")
    # TODO: dispatch the call against BASE_URL with the mapped operation
    return [{{"type": "text", "text": f"Called {{tool_name}}"}}]


if __name__ == "__main__":
    import anyio

    async def main():
        async with stdio_server() as (read, write):
            await server.run(read, write, server.create_initialization_options())

    anyio.run(main)
"#,
        title = document.info.title,
        version = document.info.version,
        base_url = base_url,
        name = name,
        tool_json = tool_json,
    )
}

fn readme(document: &ParsedDocument, tools: &[ToolSchema], name: &str) -> String {
    let mut tool_lines = String::new();
    for tool in tools {
        tool_lines.push_str(&format!("- `{}`: {}\n", tool.name, tool.description));
    }

    format!(
        "# {name}\n\nTool server generated from **{title}** (v{version}).\n\n## Tools\n\n{tool_lines}\n## Usage\n\n```sh\npip install -e .\npython server.py\n```\n",
        name = name,
        title = document.info.title,
        version = document.info.version,
        tool_lines = tool_lines,
    )
}
