//! MCP (Model Context Protocol) server implementation
//!
//! This module exposes the note vault to MCP clients: six tools for reading,
//! editing, searching and listing notes, plus a read-only resource view.

pub mod handlers;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use handlers::{DispatchError, ToolHandler};
pub use protocol::*;
pub use resources::ResourceCatalog;
pub use server::McpServer;
