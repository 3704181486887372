use clap::Parser;

/// Interactive chat client for MCP tool servers.
///
/// Spawns the given tool-server script, discovers its tools, and runs a
/// terminal REPL where Claude can call those tools while answering.
#[derive(Parser, Debug)]
#[command(name = "toolchat", about = "Chat with Claude against an MCP tool server")]
pub struct CliArgs {
    /// Path to the tool server script (.py or .js)
    pub server_script: String,

    /// Model name override (uses the config default if not set)
    #[arg(long)]
    pub model: Option<String>,

    /// API key (overrides env var and config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to config file (default: ~/.config/toolchat/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Maximum conversation turns per query
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Maximum tokens per model response
    #[arg(long)]
    pub max_tokens: Option<u32>,
}
