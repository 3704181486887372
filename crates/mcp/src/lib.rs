//! MCP (Model Context Protocol) client for toolchat.
//!
//! Connects to a tool-server process over stdio and speaks JSON-RPC 2.0
//! to it: initialize, list tools, call tools.
//!
//! # Architecture
//!
//! - **types**: JSON-RPC 2.0 and MCP protocol types (client subset)
//! - **transport**: pluggable transport layer (child-process stdio, channels)
//! - **session**: the `Session` owning one server process
//! - **error**: one error enum per failure class
//!
//! # Usage
//!
//! ```no_run
//! use toolchat_mcp::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::connect("tools/geocoder.py").await?;
//! session.initialize().await?;
//! let tools = session.list_tools().await?;
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod session;
pub mod transport;
pub mod types;

pub use error::{ConnectError, ProtocolError, ToolCallError, TransportError};
pub use session::Session;
pub use transport::{ChannelTransport, ProcessTransport, Transport};
pub use types::{ToolDescriptor, ToolOutput, PROTOCOL_VERSION};
