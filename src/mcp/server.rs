//! MCP Server implementation
//!
//! Implements the MCP server that communicates over stdio using JSON-RPC 2.0.
//! Messages are handled one at a time in arrival order.

use super::handlers::{DispatchError, ToolHandler};
use super::protocol::*;
use super::resources::ResourceCatalog;
use super::tools::all_tools;
use crate::vault::Vault;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "vault-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server that handles JSON-RPC 2.0 requests over stdio
pub struct McpServer {
    tool_handler: ToolHandler,
    resources: ResourceCatalog,
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server over the given vault
    pub fn new(vault: Arc<Vault>) -> Self {
        Self::with_tool_handler(ToolHandler::new(vault.clone()), vault)
    }

    /// Create a server with a pre-configured tool handler
    pub fn with_tool_handler(tool_handler: ToolHandler, vault: Arc<Vault>) -> Self {
        Self {
            tool_handler,
            resources: ResourceCatalog::new(vault),
            initialized: false,
        }
    }

    /// Run the server, reading from stdin and writing to stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();

        info!("MCP server starting on stdio");
        self.serve(stdin, stdout).await?;
        info!("MCP server shutting down");
        Ok(())
    }

    /// Serve newline-delimited JSON-RPC from `reader` until EOF
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(l)) => l,
                Ok(None) => break,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            if let Some(resp) = self.handle_message(&line).await {
                let json = serde_json::to_string(&resp)?;
                debug!("Sending: {}", json);
                writer.write_all(json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle a single JSON-RPC message; notifications produce no response
    pub async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let id = match &request.id {
            Some(id) => id.clone(),
            None => {
                self.handle_notification(&request);
                return None;
            }
        };

        let result = self.handle_request(&request).await;

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    /// Handle a notification (no response expected)
    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => {
                info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                warn!("Request cancelled by client");
            }
            _ => {
                debug!("Unknown notification: {}", request.method);
            }
        }
    }

    /// Handle a request and return the result or error
    async fn handle_request(&mut self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(&request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&request.params).await,
            "resources/list" => self.handle_resources_list(),
            "resources/read" => self.handle_resources_read(&request.params).await,

            _ => Err(JsonRpcError::method_not_found(&request.method)),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&mut self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = params
            .as_ref()
            .map(|p| serde_json::from_value(p.clone()))
            .transpose()
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?
            .unwrap_or(InitializeParams {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ClientCapabilities::default(),
                client_info: None,
            });

        info!(
            "Initializing MCP server (client protocol: {})",
            params.protocol_version
        );

        if let Some(ref client) = params.client_info {
            info!(
                "Client: {} v{}",
                client.name,
                client.version.as_deref().unwrap_or("unknown")
            );
        }

        self.initialized = true;

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        to_json(result)
    }

    fn ensure_initialized(&self) -> Result<(), JsonRpcError> {
        if self.initialized {
            Ok(())
        } else {
            Err(JsonRpcError::invalid_request("Server not initialized"))
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        self.ensure_initialized()?;
        to_json(ToolsListResult { tools: all_tools() })
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        self.ensure_initialized()?;
        let params: ToolCallParams = parse_params(params)?;

        info!("Tool call: {}", params.name);
        debug!("Arguments: {:?}", params.arguments);

        let tool_result = self
            .tool_handler
            .handle(&params.name, params.arguments)
            .await
            .map_err(|e| match e {
                DispatchError::UnknownTool(_) => {
                    warn!("{}", e);
                    JsonRpcError::new(METHOD_NOT_FOUND, e.to_string())
                }
            })?;

        to_json(tool_result)
    }

    /// Handle resources/list request
    fn handle_resources_list(&self) -> Result<Value, JsonRpcError> {
        self.ensure_initialized()?;

        let resources = self.resources.list().map_err(|e| {
            error!("Resource listing failed: {}", e);
            JsonRpcError::internal_error(e.to_string())
        })?;

        to_json(ResourcesListResult { resources })
    }

    /// Handle resources/read request
    async fn handle_resources_read(&self, params: &Option<Value>) -> Result<Value, JsonRpcError> {
        self.ensure_initialized()?;
        let params: ResourceReadParams = parse_params(params)?;

        info!("Resource read: {}", params.uri);

        let contents = self.resources.read(&params.uri).await.map_err(|e| {
            warn!("Resource read failed: {}", e);
            JsonRpcError::invalid_params(e.to_string())
        })?;

        to_json(ResourceReadResult {
            contents: vec![contents],
        })
    }
}

fn parse_params<T: DeserializeOwned>(params: &Option<Value>) -> Result<T, JsonRpcError> {
    let value = params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params("params required"))?;
    serde_json::from_value(value.clone()).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn to_json<T: serde::Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
