mod cli;
mod config;
#[allow(dead_code)]
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use toolchat_agent::{Orchestrator, ReasoningEngine, ToolCatalog};
use toolchat_llm::ClaudeEngine;
use toolchat_mcp::Session;

use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let terminal = Terminal::new();

    let config = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;

    let model = config.resolve_model(args.model.as_deref());
    let api_key = config.resolve_api_key(args.api_key.as_deref()).context(
        "no API key: pass --api-key, set ANTHROPIC_API_KEY, or add api_key to the config file",
    )?;

    let engine: Arc<dyn ReasoningEngine> = Arc::new(ClaudeEngine::new(
        api_key,
        model.clone(),
        config.anthropic_base_url.clone(),
    ));

    let mut session = Session::connect(&args.server_script)
        .await
        .with_context(|| format!("failed to connect to tool server '{}'", args.server_script))?;

    // The session is released below no matter how the chat loop ends.
    let result = chat_loop(&terminal, engine, &mut session, &args, &config, &model).await;
    session.close().await;

    if result.is_ok() {
        terminal.print_info("Session closed.")?;
    }
    result
}

async fn chat_loop(
    terminal: &Terminal,
    engine: Arc<dyn ReasoningEngine>,
    session: &mut Session,
    args: &CliArgs,
    config: &AppConfig,
    model: &str,
) -> Result<()> {
    session
        .initialize()
        .await
        .context("tool server handshake failed")?;

    let catalog = ToolCatalog::fetch(session)
        .await
        .context("failed to list tools")?;

    terminal.print_banner(model, &args.server_script)?;
    terminal.print_tools(&catalog.names())?;
    info!(tools = catalog.names().join(","), "ready for queries");

    let orchestrator = Orchestrator::new(engine)
        .with_max_turns(args.max_turns.unwrap_or(config.max_turns))
        .with_max_tokens(args.max_tokens.unwrap_or(config.max_tokens));

    loop {
        let input = match terminal.read_input()? {
            Some(text) => text,
            None => {
                terminal.print_info("Goodbye.")?;
                break;
            }
        };

        if input.is_empty() {
            continue;
        }

        let answer = orchestrator.run(session, &catalog, &input).await;
        terminal.print_response(&answer)?;
    }

    Ok(())
}
