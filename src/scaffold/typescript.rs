//! TypeScript project scaffold

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
            path: "package.json".to_string(),
            content: package_json(document, name),
        },
        ScaffoldFile {
            path: "tsconfig.json".to_string(),
            content: TSCONFIG.to_string(),
        },
        ScaffoldFile {
            path: "src/index.ts".to_string(),
            content: index_ts(document, tools, name),
        },
        ScaffoldFile {
            path: "README.md".to_string(),
            content: readme(document, tools, name),
        },
    ]
}

fn package_json(document: &ParsedDocument, name: &str) -> String {
    format!(
        r#"{{
  "name": "{name}",
  "version": "0.1.0",
  "description": "Tool server generated from {title}",
  "type": "module",
  "main": "dist/index.js",
  "scripts": {{
    "build": "tsc",
    "start": "node dist/index.js"
  }},
  "dependencies": {{
    "@modelcontextprotocol/sdk": "^1.0.0"
  }},
  "devDependencies": {{
    "typescript": "^5.4.0"
  }}
}}
"#,
        name = name,
        title = document.info.title,
    )
}

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2022",
    "module": "Node16",
    "moduleResolution": "Node16",
    "outDir": "dist",
    "rootDir": "src",
    "strict": true
  },
  "include": ["src/**/*"]
}
"#;

fn index_ts(document: &ParsedDocument, tools: &[ToolSchema], name: &str) -> String {
    let tool_json = serde_json::to_string_pretty(tools).unwrap_or_else(|_| "[]".to_string());
    let base_url = document
        .servers
        .first()
        .map(|s| s.url.as_str())
        .unwrap_or("http://localhost");

    format!(
        r#"// Generated from {title} v{version}
import {{ Server }} from "@modelcontextprotocol/sdk/server/index.js";
import {{ StdioServerTransport }} from "@modelcontextprotocol/sdk/server/stdio.js";

const BASE_URL = process.env.API_BASE_URL ?? "{base_url}";

const TOOLS = {tool_json};

const server = new Server(
  {{ name: "{name}", version: "0.1.0" }},
  {{ capabilities: {{ tools: {{}} }} }}
);

server.setRequestHandler("tools/list", async () => ({{ tools: TOOLS }}));

server.setRequestHandler("tools/call", async (request) => {{
  const tool = TOOLS.find((t) => t.name === request.params.name);
  if (!tool) {{
    throw new Error(`Unknown tool: ${{request.params.name}}`);
  }}
  // TODO: dispatch the call against BASE_URL with the mapped operation
  return {{
    content: [{{ type: "text", text: `Called ${{tool.name}}` }}],
  }};
}});

const transport = new StdioServerTransport();
await server.connect(transport);
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
        "# {name}\n\nTool server generated from **{title}** (v{version}).\n\n## Tools\n\n{tool_lines}\n## Usage\n\n```sh\nnpm install\nnpm run build\nnpm start\n```\n",
        name = name,
        title = document.info.title,
        version = document.info.version,
        tool_lines = tool_lines,
    )
}
