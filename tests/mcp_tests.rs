//! End-to-end tests for the MCP server
//!
//! Each test builds a throwaway vault, feeds newline-delimited JSON-RPC into
//! `McpServer::serve` and inspects the responses.

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vault_mcp::mcp::McpServer;
use vault_mcp::vault::Vault;
use vault_mcp::Config;

fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn server_for(root: &Path) -> McpServer {
    let config = Config::new(root);
    let vault = Vault::from_config(&config).unwrap();
    McpServer::new(Arc::new(vault))
}

/// Run a session of requests (ids assigned in order, after an initialize)
/// and return the responses keyed by position.
async fn session(root: &Path, requests: &[(&str, Value)]) -> Vec<Value> {
    let mut input = String::new();
    input.push_str(&json!({"jsonrpc": "2.0", "method": "initialize", "id": 0}).to_string());
    input.push('\n');
    input.push_str(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string());
    input.push('\n');
    for (i, (method, params)) in requests.iter().enumerate() {
        let req = json!({"jsonrpc": "2.0", "method": method, "params": params, "id": i + 1});
        input.push_str(&req.to_string());
        input.push('\n');
    }

    let mut output = Vec::new();
    server_for(root)
        .serve(input.as_bytes(), &mut output)
        .await
        .unwrap();

    let mut responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    // Drop the initialize response
    responses.remove(0);
    responses
}

fn tool(name: &str, arguments: Value) -> (&'static str, Value) {
    ("tools/call", json!({"name": name, "arguments": arguments}))
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

fn is_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}

#[tokio::test]
async fn test_tools_list_has_six_tools() {
    let dir = vault_with(&[]);
    let responses = session(dir.path(), &[("tools/list", json!({}))]).await;

    let names: Vec<&str> = responses[0]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "read_note",
            "write_note",
            "append_to_note",
            "patch_note",
            "search_notes",
            "list_notes"
        ]
    );
}

#[tokio::test]
async fn test_write_append_patch_read_cycle() {
    let dir = vault_with(&[]);
    let responses = session(
        dir.path(),
        &[
            tool("write_note", json!({"path": "/journal/day.md", "content": "x x"})),
            tool("append_to_note", json!({"path": "journal/day.md", "content": "B"})),
            tool(
                "patch_note",
                json!({"path": "journal/day.md", "old_text": "x", "new_text": "y"}),
            ),
            tool("read_note", json!({"path": "journal/day.md"})),
        ],
    )
    .await;

    assert_eq!(text(&responses[0]), "Successfully wrote to /journal/day.md");
    assert_eq!(text(&responses[1]), "Successfully appended to journal/day.md");
    assert_eq!(text(&responses[2]), "Successfully patched journal/day.md");
    assert_eq!(text(&responses[3]), "y x\nB");
    assert!(responses.iter().all(|r| !is_error(r)));
}

#[tokio::test]
async fn test_failures_are_results_not_rpc_errors() {
    let dir = vault_with(&[("a.md", "content")]);
    let responses = session(
        dir.path(),
        &[
            tool("read_note", json!({"path": "../../etc/passwd"})),
            tool("read_note", json!({"path": "missing.md"})),
            tool("append_to_note", json!({"path": "missing.md", "content": "x"})),
            tool(
                "patch_note",
                json!({"path": "a.md", "old_text": "absent", "new_text": "y"}),
            ),
            tool("write_note", json!({"path": "b.md"})),
        ],
    )
    .await;

    for response in &responses {
        assert!(response.get("error").is_none(), "unexpected rpc error: {response}");
        assert!(is_error(response), "expected error flag: {response}");
    }
    assert!(text(&responses[0]).starts_with("Access denied"));
    assert_eq!(text(&responses[1]), "File not found: missing.md");
    assert_eq!(text(&responses[3]), "Text to replace not found in a.md");
    assert_eq!(text(&responses[4]), "Invalid arguments: content is required");

    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "content");
    assert!(!dir.path().join("missing.md").exists());
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let dir = vault_with(&[]);
    let responses = session(dir.path(), &[tool("format_disk", json!({}))]).await;
    assert_eq!(responses[0]["error"]["code"], -32601);
    assert!(responses[0].get("result").is_none());
}

#[tokio::test]
async fn test_search_content_and_filename() {
    let dir = vault_with(&[("a.md", "hello world"), ("b/hello.md", "nothing here")]);
    let responses = session(dir.path(), &[tool("search_notes", json!({"query": "HELLO"}))]).await;

    let hits: Vec<Value> = serde_json::from_str(text(&responses[0])).unwrap();
    assert_eq!(
        hits,
        vec![
            json!({"path": "a.md", "snippet": "...hello world..."}),
            json!({"path": "b/hello.md", "snippet": "Matched in filename"}),
        ]
    );
}

#[tokio::test]
async fn test_search_never_exceeds_twenty_results() {
    let files: Vec<(String, &str)> = (0..45)
        .map(|i| (format!("n{:02}.md", i), "shared keyword"))
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(n, c)| (n.as_str(), *c)).collect();
    let dir = vault_with(&borrowed);

    let responses = session(dir.path(), &[tool("search_notes", json!({"query": "keyword"}))]).await;
    let hits: Vec<Value> = serde_json::from_str(text(&responses[0])).unwrap();
    assert_eq!(hits.len(), 20);
}

#[tokio::test]
async fn test_list_notes_limit_and_exclusions() {
    let dir = vault_with(&[
        ("a.md", ""),
        ("b.md", ""),
        (".obsidian/app.md", ""),
        ("c.txt", ""),
    ]);
    let responses = session(
        dir.path(),
        &[
            tool("list_notes", json!({"limit": 1})),
            tool("list_notes", json!({})),
        ],
    )
    .await;

    let first: Vec<String> = serde_json::from_str(text(&responses[0])).unwrap();
    assert_eq!(first, vec!["a.md"]);
    let all: Vec<String> = serde_json::from_str(text(&responses[1])).unwrap();
    assert_eq!(all, vec!["a.md", "b.md"]);
}

#[tokio::test]
async fn test_resources_list_and_read() {
    let dir = vault_with(&[("Daily Notes/today.md", "# Today")]);
    let responses = session(
        dir.path(),
        &[
            ("resources/list", json!({})),
            (
                "resources/read",
                json!({"uri": "vault:///Daily%20Notes/today.md"}),
            ),
            ("resources/read", json!({"uri": "vault:///../secret.md"})),
        ],
    )
    .await;

    assert_eq!(
        responses[0]["result"]["resources"],
        json!([{
            "uri": "vault:///Daily%20Notes/today.md",
            "name": "Daily Notes/today.md",
            "mimeType": "text/markdown"
        }])
    );
    assert_eq!(
        responses[1]["result"]["contents"],
        json!([{
            "uri": "vault:///Daily%20Notes/today.md",
            "mimeType": "text/markdown",
            "text": "# Today"
        }])
    );
    assert!(responses[2]["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Access denied"));
}

#[tokio::test]
async fn test_missing_vault_reported_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("not-created-yet");
    let responses = session(
        &root,
        &[
            tool("list_notes", json!({})),
            tool("write_note", json!({"path": "first.md", "content": "hi"})),
            tool("list_notes", json!({})),
        ],
    )
    .await;

    assert!(is_error(&responses[0]));
    assert!(!is_error(&responses[1]));
    let listed: Vec<String> = serde_json::from_str(text(&responses[2])).unwrap();
    assert_eq!(listed, vec!["first.md"]);
}
