//! Error types for the MCP client crate.
//!
//! Each failure class gets its own enum so callers can match exhaustively
//! on what actually went wrong: connecting is fatal to the whole run,
//! handshake/listing failures are fatal to the session, and a single tool
//! call failing is recoverable within a conversation.

/// The byte-stream channel to the server broke.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Transport I/O error.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The server closed its end of the stream.
    #[error("server closed the connection")]
    Closed,

    /// A frame arrived that is not valid JSON-RPC.
    #[error("malformed frame: {0}")]
    Frame(#[from] serde_json::Error),

    /// The server sent something structurally wrong (e.g. a response
    /// with neither result nor error).
    #[error("protocol violation: {0}")]
    Violation(String),
}

/// Failed to start or reach the server process.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The script path has no known interpreter mapping.
    #[error("unsupported server script '{path}': must be a .py or .js file")]
    UnsupportedScript { path: String },

    /// `MCP_SERVER_EXTERNAL=true` requests a mode this client does not implement.
    #[error("external server connections are not implemented")]
    ExternalServer,

    /// Spawning the interpreter failed.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The spawned process is missing a stdio pipe.
    #[error("server process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Handshake or tool listing failed after the connection was established.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// An operation was attempted before `initialize` succeeded.
    #[error("session not initialized: call initialize first")]
    NotInitialized,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a JSON-RPC error object.
    #[error("server rejected {method}: {message} (code {code})")]
    Rpc {
        method: &'static str,
        code: i64,
        message: String,
    },
}

/// A single `tools/call` failed.
///
/// `Tool` means the server executed the request and reported an
/// application-level error; the conversation can continue. `Transport`
/// means the channel itself broke, which no follow-up call will survive.
#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    /// The call was attempted before `initialize` succeeded.
    #[error("session not initialized: call initialize first")]
    NotInitialized,

    /// The server returned an error for this specific invocation.
    #[error("{0}")]
    Tool(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
