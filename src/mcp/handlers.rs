//! MCP Tool handlers
//!
//! Maps a tool name and its argument object onto the vault. Every vault
//! failure becomes a [`ToolCallResult`] with the error flag set; only an
//! unknown tool name escapes as an `Err`.

use super::protocol::ToolCallResult;
use crate::vault::{store, ResolvedPath, Vault, VaultError, VaultResult};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Failures at the dispatch boundary itself
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Handles MCP tool calls
pub struct ToolHandler {
    vault: Arc<Vault>,
    default_list_limit: usize,
}

impl ToolHandler {
    pub fn new(vault: Arc<Vault>) -> Self {
        Self {
            vault,
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_default_list_limit(mut self, limit: usize) -> Self {
        self.default_list_limit = limit;
        self
    }

    /// Handle a tool call and wrap the outcome for the client
    pub async fn handle(
        &self,
        name: &str,
        args: Option<Value>,
    ) -> Result<ToolCallResult, DispatchError> {
        let args = args.unwrap_or(json!({}));

        let outcome = match name {
            "read_note" => self.read_note(&args).await,
            "write_note" => self.write_note(&args).await,
            "append_to_note" => self.append_to_note(&args).await,
            "patch_note" => self.patch_note(&args).await,
            "search_notes" => self.search_notes(&args).await,
            "list_notes" => self.list_notes(&args),

            _ => return Err(DispatchError::UnknownTool(name.to_string())),
        };

        Ok(match outcome {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolCallResult::error(e.to_string())
            }
        })
    }

    // ========================================================================
    // Note I/O
    // ========================================================================

    async fn read_note(&self, args: &Value) -> VaultResult<String> {
        let path = self.resolve_arg(args, "path")?;
        store::read(&path).await
    }

    async fn write_note(&self, args: &Value) -> VaultResult<String> {
        let path = self.resolve_arg(args, "path")?;
        let content = required_str(args, "content")?;

        store::write(&path, content).await?;
        debug!("Wrote {} bytes to {}", content.len(), path.relative());
        Ok(format!("Successfully wrote to {}", path.relative()))
    }

    async fn append_to_note(&self, args: &Value) -> VaultResult<String> {
        let path = self.resolve_arg(args, "path")?;
        let content = required_str(args, "content")?;

        store::append(&path, content).await?;
        Ok(format!("Successfully appended to {}", path.relative()))
    }

    async fn patch_note(&self, args: &Value) -> VaultResult<String> {
        let path = self.resolve_arg(args, "path")?;
        let old_text = required_str(args, "old_text")?;
        let new_text = required_str(args, "new_text")?;

        store::patch(&path, old_text, new_text).await?;
        Ok(format!("Successfully patched {}", path.relative()))
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    async fn search_notes(&self, args: &Value) -> VaultResult<String> {
        let query = required_str(args, "query")?;

        let candidates = self.vault.scanner().list_markdown_files()?;
        let hits = self
            .vault
            .search_engine()
            .search(query, &candidates)
            .await?;

        debug!("Search '{}' matched {} notes", query, hits.len());
        Ok(serde_json::to_string_pretty(&hits)?)
    }

    fn list_notes(&self, args: &Value) -> VaultResult<String> {
        let limit = args
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(self.default_list_limit);

        let files = self.vault.scanner().list_markdown_files()?;
        let page: Vec<&String> = files.iter().take(limit).collect();
        Ok(serde_json::to_string_pretty(&page)?)
    }

    fn resolve_arg(&self, args: &Value, key: &str) -> VaultResult<ResolvedPath> {
        let relative = required_str(args, key)?;
        self.vault.resolver().resolve(relative)
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> VaultResult<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| VaultError::invalid_arguments(format!("{} is required", key)))
}
