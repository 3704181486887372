//! The reasoning-engine provider trait.
//!
//! This trait lives in the agent crate (not in crates/llm) because it's
//! defined by the consumer (the orchestrator), not the provider.
//! Implementations live in crates/llm.

use async_trait::async_trait;

use crate::catalog::ToolDefinition;
use crate::conversation::{ContentBlock, Message};

/// An external decision-making service that, given conversation history
/// and available tools, returns an ordered list of content blocks.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Request the engine's next response for the given history.
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, EngineError>;

    /// Engine name for logging/debugging (e.g. "claude").
    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("authentication failed")]
    Auth,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Mock engine for testing the orchestrator without real API calls.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns pre-queued responses in FIFO order and records every
    /// message history it was asked to complete.
    pub struct MockEngine {
        responses: Mutex<VecDeque<Result<Vec<ContentBlock>, EngineError>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                seen: Mutex::new(Vec::new()),
            }
        }

        /// Queue a full content-block response.
        pub fn queue_blocks(&self, blocks: Vec<ContentBlock>) {
            self.responses.lock().unwrap().push_back(Ok(blocks));
        }

        /// Queue a plain text response.
        pub fn queue_text(&self, text: &str) {
            self.queue_blocks(vec![ContentBlock::Text {
                text: text.to_string(),
            }]);
        }

        /// Queue a failure for the next request.
        pub fn queue_error(&self, error: EngineError) {
            self.responses.lock().unwrap().push_back(Err(error));
        }

        /// Message histories seen so far, one per `complete` call.
        pub fn histories(&self) -> Vec<Vec<Message>> {
            self.seen.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Default for MockEngine {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ReasoningEngine for MockEngine {
        async fn complete(
            &self,
            messages: &[Message],
            _tools: &[ToolDefinition],
            _max_tokens: u32,
        ) -> Result<Vec<ContentBlock>, EngineError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }
}
