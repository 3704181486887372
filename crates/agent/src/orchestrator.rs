//! The turn-taking loop that drives one query to completion.
//!
//! Flow: User → Engine → (ToolUse → Execute → Result → Engine)* → Final Text

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use toolchat_mcp::{Session, ToolOutput};

use crate::catalog::ToolCatalog;
use crate::conversation::{ContentBlock, Conversation};
use crate::engine::ReasoningEngine;

/// Orchestrates one conversation per query: sends the growing history
/// plus the tool catalog to the reasoning engine, executes at most one
/// tool call per model turn through the session, and feeds the result
/// back until the engine answers with text alone.
///
/// Errors never escape `run`: an engine failure ends the query with its
/// message in the output, and a tool failure is fed back to the engine
/// as an error result so it can react.
pub struct Orchestrator {
    engine: Arc<dyn ReasoningEngine>,
    max_turns: usize,
    max_tokens: u32,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self {
            engine,
            max_turns: 10,
            max_tokens: 1000,
        }
    }

    /// Cap the number of engine round-trips per query.
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Run a single user query to completion.
    ///
    /// Returns every text block the engine produced across all turns,
    /// in order, joined with newlines — including inline error text.
    pub async fn run(&self, session: &mut Session, catalog: &ToolCatalog, query: &str) -> String {
        let mut conversation = Conversation::new();
        conversation.push_user_text(query);

        let mut output: Vec<String> = Vec::new();
        let mut finished = false;
        let mut turn = 0;

        while !finished {
            if turn >= self.max_turns {
                warn!(turns = turn, "turn cap reached, ending query");
                output.push(format!(
                    "Stopped after {} turns without a final answer.",
                    self.max_turns
                ));
                break;
            }
            turn += 1;
            debug!(turn, engine = %self.engine.name(), "requesting engine response");

            let content = match self
                .engine
                .complete(conversation.messages(), catalog.definitions(), self.max_tokens)
                .await
            {
                Ok(content) => content,
                Err(e) => {
                    // A single failed engine call ends the query; no retry.
                    warn!(error = %e, "engine request failed");
                    output.push(format!("Error: {e}"));
                    break;
                }
            };

            let mut staged: Vec<ContentBlock> = Vec::new();
            let mut pending_call: Option<(String, String, Value)> = None;

            for block in content {
                match block {
                    ContentBlock::Text { text } => {
                        output.push(text.clone());
                        staged.push(ContentBlock::Text { text });
                    }
                    ContentBlock::ToolUse { id, name, input } => {
                        staged.push(ContentBlock::ToolUse {
                            id: id.clone(),
                            name: name.clone(),
                            input: input.clone(),
                        });
                        pending_call = Some((id, name, input));
                        // One tool call per model turn; the engine re-issues
                        // anything it still wants after seeing this result.
                        break;
                    }
                    ContentBlock::ToolResult { tool_use_id, .. } => {
                        warn!(tool_use_id = %tool_use_id, "engine returned a tool_result block, ignoring");
                    }
                }
            }

            conversation.push_assistant(staged);

            match pending_call {
                Some((id, name, input)) => {
                    info!(tool = %name, "executing tool call");
                    let (result_text, is_error) = match session.call_tool(&name, input).await {
                        Ok(tool_output) => render_tool_output(tool_output),
                        Err(e) => {
                            // Fed back to the engine rather than ending the
                            // conversation; it can retry or apologize.
                            warn!(tool = %name, error = %e, "tool call failed");
                            (format!("Error: {e}"), true)
                        }
                    };
                    conversation.push_tool_result(id, result_text, is_error);
                }
                None => finished = true,
            }
        }

        output.join("\n")
    }
}

fn render_tool_output(output: ToolOutput) -> (String, bool) {
    match output {
        ToolOutput::Text(text) => (text, false),
        ToolOutput::Structured(value) => (value.to_string(), false),
        ToolOutput::Error(message) => (format!("Error: {message}"), true),
    }
}
