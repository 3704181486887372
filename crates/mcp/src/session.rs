//! MCP client session.
//!
//! Owns exactly one spawned tool-server process and the duplex channel to
//! it, and exposes the request/response surface the rest of the system
//! uses: `initialize`, `list_tools`, `call_tool`, `close`.

use serde_json::{json, Value};
use tokio::process::{Child, Command};

use crate::error::{ConnectError, ProtocolError, ToolCallError, TransportError};
use crate::transport::{ProcessTransport, Transport};
use crate::types::*;

/// Environment variable that requests attaching to an externally managed
/// server instead of spawning one. Recognized but not implemented.
pub const EXTERNAL_SERVER_ENV: &str = "MCP_SERVER_EXTERNAL";

/// Pick the interpreter that launches a server script, keyed off the
/// file extension. An unrecognized extension is a configuration error,
/// not a default.
fn interpreter_for(script_path: &str) -> Result<&'static str, ConnectError> {
    if script_path.ends_with(".py") {
        Ok("python")
    } else if script_path.ends_with(".js") {
        Ok("node")
    } else {
        Err(ConnectError::UnsupportedScript {
            path: script_path.to_string(),
        })
    }
}

fn external_server_requested() -> bool {
    std::env::var(EXTERNAL_SERVER_ENV)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// A client session connected to one MCP server process over stdio.
///
/// All operations take `&mut self`: the protocol is strictly
/// request/response with no multiplexing, so at most one call is ever in
/// flight. The session is the sole owner of the child process; `close`
/// releases it and is idempotent.
pub struct Session {
    transport: Box<dyn Transport>,
    child: Option<Child>,
    next_id: i64,
    initialized: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("child", &self.child.is_some())
            .field("next_id", &self.next_id)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Spawn a tool-server script and connect to its standard streams.
    ///
    /// Does not perform the protocol handshake; call [`Session::initialize`]
    /// before any other operation.
    pub async fn connect(script_path: &str) -> Result<Self, ConnectError> {
        let program = interpreter_for(script_path)?;

        if external_server_requested() {
            return Err(ConnectError::ExternalServer);
        }

        tracing::info!(program = %program, script = %script_path, "spawning tool server process");

        let mut child = Command::new(program)
            .arg(script_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ConnectError::Spawn {
                command: format!("{program} {script_path}"),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or(ConnectError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(ConnectError::MissingPipe("stdout"))?;

        Ok(Self {
            transport: Box::new(ProcessTransport::new(stdin, stdout)),
            child: Some(child),
            next_id: 1,
            initialized: false,
        })
    }

    /// Build a session over an arbitrary transport, with no owned process.
    ///
    /// Used by tests to drive the protocol over in-memory channels.
    pub fn from_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            child: None,
            next_id: 1,
            initialized: false,
        }
    }

    /// Send a JSON-RPC request and read the one response.
    async fn request(
        &mut self,
        method: &'static str,
        params: Option<Value>,
    ) -> Result<JsonRpcResponse, TransportError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest::new(RpcId::Number(id), method, params);
        let json = serde_json::to_string(&request)?;

        tracing::debug!(method = %method, id = %id, "sending request");
        self.transport.send(&json).await?;

        let line = self
            .transport
            .receive()
            .await?
            .ok_or(TransportError::Closed)?;

        let response: JsonRpcResponse = serde_json::from_str(&line)?;
        Ok(response)
    }

    /// Send a JSON-RPC notification (no response expected).
    async fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), TransportError> {
        let notif = JsonRpcNotification::new(method, params);
        let json = serde_json::to_string(&notif)?;
        self.transport.send(&json).await
    }

    /// Perform the MCP initialization handshake.
    ///
    /// Must complete before `list_tools` or `call_tool`; both fail fast
    /// until it has.
    pub async fn initialize(&mut self) -> Result<(), ProtocolError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": "toolchat",
                "version": env!("CARGO_PKG_VERSION")
            }
        });

        let resp = self.request("initialize", Some(params)).await?;
        if let Some(err) = resp.error {
            return Err(ProtocolError::Rpc {
                method: "initialize",
                code: err.code,
                message: err.message,
            });
        }

        let result: InitializeResult = serde_json::from_value(
            resp.result
                .ok_or_else(|| TransportError::Violation("initialize carried no result".into()))?,
        )
        .map_err(TransportError::from)?;

        self.notify("notifications/initialized", None).await?;
        self.initialized = true;

        tracing::info!(
            server = %result.server_info.name,
            protocol = %result.protocol_version,
            "session initialized"
        );
        Ok(())
    }

    /// Query the server for its declared tools.
    ///
    /// The order returned by the server is preserved.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, ProtocolError> {
        if !self.initialized {
            return Err(ProtocolError::NotInitialized);
        }

        let resp = self.request("tools/list", None).await?;
        if let Some(err) = resp.error {
            return Err(ProtocolError::Rpc {
                method: "tools/list",
                code: err.code,
                message: err.message,
            });
        }

        let result: ListToolsResult = serde_json::from_value(
            resp.result
                .ok_or_else(|| TransportError::Violation("tools/list carried no result".into()))?,
        )
        .map_err(TransportError::from)?;

        tracing::debug!(count = result.tools.len(), "tool listing complete");
        Ok(result.tools)
    }

    /// Invoke one tool on the server and block until its response.
    ///
    /// An in-band failure (`isError` content) comes back as
    /// [`ToolOutput::Error`]; a JSON-RPC error for the invocation is
    /// [`ToolCallError::Tool`]; a broken channel is
    /// [`ToolCallError::Transport`].
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolOutput, ToolCallError> {
        if !self.initialized {
            return Err(ToolCallError::NotInitialized);
        }

        let params = json!({
            "name": name,
            "arguments": arguments,
        });

        tracing::debug!(tool = %name, "calling tool");
        let resp = self.request("tools/call", Some(params)).await?;
        if let Some(err) = resp.error {
            return Err(ToolCallError::Tool(err.message));
        }

        let result: CallToolResult = serde_json::from_value(
            resp.result
                .ok_or_else(|| TransportError::Violation("tools/call carried no result".into()))?,
        )
        .map_err(TransportError::from)?;

        if result.is_error {
            return Ok(ToolOutput::Error(result.joined_text()));
        }
        if let Some(structured) = result.structured_content {
            return Ok(ToolOutput::Structured(structured));
        }
        Ok(ToolOutput::Text(result.joined_text()))
    }

    /// Best-effort termination of the server process.
    ///
    /// Idempotent and safe to call after a prior failure. The child is
    /// also killed on drop, so this only makes shutdown explicit.
    pub async fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            tracing::info!("shutting down tool server process");
            if let Err(e) = child.kill().await {
                tracing::debug!(error = %e, "server process already gone");
            }
        }
    }
}
