//! MCP Tool definitions
//!
//! Defines the six note tools exposed by the server.

use super::protocol::{InputSchema, ToolDefinition};
use crate::vault::search::MAX_RESULTS_LIMIT;
use serde_json::json;

/// Generate all tool definitions
pub fn all_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(note_io_tools());
    tools.extend(discovery_tools());
    tools
}

/// Names of every tool, in definition order
pub fn tool_names() -> Vec<String> {
    all_tools().into_iter().map(|t| t.name).collect()
}

// ============================================================================
// Note I/O Tools (4)
// ============================================================================

fn note_io_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "read_note".to_string(),
            description: "Read the contents of a note in the vault".to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "path": {"type": "string", "description": "Path to the note, relative to the vault root"}
                })),
                required: Some(vec!["path".to_string()]),
            },
        },
        ToolDefinition {
            name: "write_note".to_string(),
            description: "Create a note or overwrite it entirely. Missing folders are created"
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "path": {"type": "string", "description": "Path to the note, relative to the vault root"},
                    "content": {"type": "string", "description": "Full note content"}
                })),
                required: Some(vec!["path".to_string(), "content".to_string()]),
            },
        },
        ToolDefinition {
            name: "append_to_note".to_string(),
            description: "Append content on a new line at the end of an existing note"
                .to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "path": {"type": "string", "description": "Path to an existing note"},
                    "content": {"type": "string", "description": "Content to append"}
                })),
                required: Some(vec!["path".to_string(), "content".to_string()]),
            },
        },
        ToolDefinition {
            name: "patch_note".to_string(),
            description: "Replace the first occurrence of a piece of text in a note".to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "path": {"type": "string", "description": "Path to an existing note"},
                    "old_text": {"type": "string", "description": "Exact text to find (first occurrence is replaced)"},
                    "new_text": {"type": "string", "description": "Replacement text"}
                })),
                required: Some(vec![
                    "path".to_string(),
                    "old_text".to_string(),
                    "new_text".to_string(),
                ]),
            },
        },
    ]
}

// ============================================================================
// Discovery Tools (2)
// ============================================================================

fn discovery_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "search_notes".to_string(),
            description: format!(
                "Case-insensitive search over note contents and paths (max {} results)",
                MAX_RESULTS_LIMIT
            ),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "query": {"type": "string", "description": "Text to search for"}
                })),
                required: Some(vec!["query".to_string()]),
            },
        },
        ToolDefinition {
            name: "list_notes".to_string(),
            description: "List markdown notes in the vault".to_string(),
            input_schema: InputSchema {
                schema_type: "object".to_string(),
                properties: Some(json!({
                    "limit": {"type": "integer", "description": "Max notes to return (default 50)"}
                })),
                required: None,
            },
        },
    ]
}
