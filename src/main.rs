//! Vault MCP Server
//!
//! Serves a directory of markdown notes to MCP clients over stdio.
//!
//! # Usage
//!
//! ```bash
//! vault-mcp ~/Documents/MyVault
//!
//! # With debug logging (logs go to stderr)
//! RUST_LOG=vault_mcp=debug vault-mcp ~/Documents/MyVault
//! ```
//!
//! # Client Integration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "vault": {
//!       "command": "/path/to/vault-mcp",
//!       "args": ["/path/to/vault"]
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vault_mcp::mcp::{McpServer, ToolHandler};
use vault_mcp::vault::Vault;
use vault_mcp::Config;

/// MCP server for a local markdown vault
#[derive(Parser, Debug)]
#[command(name = "vault-mcp")]
#[command(about = "MCP server exposing read, write, search and list tools over a note vault")]
#[command(version)]
struct Args {
    /// Path to the vault directory
    #[arg(env = "VAULT_PATH")]
    vault_path: PathBuf,

    /// YAML config file (defaults to ./vault-mcp.yaml when present)
    #[arg(long, env = "VAULT_MCP_CONFIG")]
    config: Option<PathBuf>,
}

const DEFAULT_LOG_FILTER: &str = "vault_mcp=info";

/// `RUST_LOG` wins when set and valid; otherwise log this crate at info
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging (to stderr to keep stdout clean for MCP)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args = Args::parse();

    let config = Config::from_yaml_and_env(&args.vault_path, args.config.as_deref())?;
    info!("Starting MCP server for vault {}", config.vault_path.display());

    let vault = match Vault::from_config(&config) {
        Ok(v) => Arc::new(v),
        Err(e) => {
            error!("Failed to open vault: {}", e);
            return Err(e.into());
        }
    };

    let tool_handler =
        ToolHandler::new(vault.clone()).with_default_list_limit(config.list_default_limit);
    let mut server = McpServer::with_tool_handler(tool_handler, vault);

    if let Err(e) = server.run().await {
        error!("MCP server error: {}", e);
        return Err(e);
    }

    Ok(())
}
