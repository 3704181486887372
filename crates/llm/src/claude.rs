//! Claude (Anthropic API) implementation of [`ReasoningEngine`].
//!
//! Non-streaming Messages API with tool use. Conversation messages and
//! tool definitions already serialize to the API's wire shape, so the
//! request body is assembled without a translation layer.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use toolchat_agent::{ContentBlock, EngineError, Message, ReasoningEngine, ToolDefinition};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct ClaudeEngine {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeEngine {
    /// Create a new Claude engine.
    ///
    /// # Arguments
    /// * `api_key` - Anthropic API key
    /// * `model` - Model name (e.g. `"claude-3-5-sonnet-20241022"`)
    /// * `base_url` - API base URL (e.g. `"https://api.anthropic.com"`)
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Create an engine with sensible defaults.
    pub fn with_defaults(api_key: String) -> Self {
        Self::new(
            api_key,
            DEFAULT_MODEL.to_string(),
            DEFAULT_BASE_URL.to_string(),
        )
    }
}

fn request_body(
    model: &str,
    messages: &[Message],
    tools: &[ToolDefinition],
    max_tokens: u32,
) -> Result<Value, EngineError> {
    let mut body = json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": messages,
    });
    if !tools.is_empty() {
        body["tools"] = serde_json::to_value(tools)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
    }
    Ok(body)
}

#[async_trait]
impl ReasoningEngine for ClaudeEngine {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        max_tokens: u32,
    ) -> Result<Vec<ContentBlock>, EngineError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = request_body(&self.model, messages, tools, max_tokens)?;

        debug!(model = %self.model, url = %url, "sending messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 {
            return Err(EngineError::Auth);
        }
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Api { status, message });
        }

        let resp: Value = response
            .json()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let content = resp
            .get("content")
            .cloned()
            .ok_or_else(|| EngineError::InvalidResponse("missing content".to_string()))?;

        serde_json::from_value(content).map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &str {
        "claude"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolchat_agent::{Conversation, Role};

    fn sample_tools() -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "geocode".to_string(),
            description: "Geocode an address".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"address": {"type": "string"}},
                "required": ["address"]
            }),
        }]
    }

    #[test]
    fn test_request_body_shape() {
        let mut conv = Conversation::new();
        conv.push_user_text("Where is the Eiffel Tower?");

        let body =
            request_body(DEFAULT_MODEL, conv.messages(), &sample_tools(), 1000).unwrap();

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(
            body["messages"][0]["content"][0]["text"],
            "Where is the Eiffel Tower?"
        );
        assert_eq!(body["tools"][0]["name"], "geocode");
        assert!(body["tools"][0]["input_schema"].is_object());
    }

    #[test]
    fn test_request_body_omits_empty_tools() {
        let mut conv = Conversation::new();
        conv.push_user_text("hi");
        let body = request_body(DEFAULT_MODEL, conv.messages(), &[], 1000).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_request_body_carries_tool_round_trip() {
        let mut conv = Conversation::new();
        conv.push_user_text("Where is the Eiffel Tower?");
        conv.push_assistant(vec![ContentBlock::ToolUse {
            id: "toolu_1".to_string(),
            name: "geocode".to_string(),
            input: json!({"address": "Eiffel Tower"}),
        }]);
        conv.push_tool_result("toolu_1", "48.858, 2.294", false);

        let body = request_body(DEFAULT_MODEL, conv.messages(), &sample_tools(), 1000).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1]["content"][0]["type"], "tool_use");
        assert_eq!(messages[2]["content"][0]["type"], "tool_result");
        assert_eq!(messages[2]["content"][0]["tool_use_id"], "toolu_1");
    }

    #[test]
    fn test_response_content_parses_into_blocks() {
        // Shape of a real Messages API response body.
        let resp = json!({
            "id": "msg_01",
            "role": "assistant",
            "stop_reason": "tool_use",
            "content": [
                {"type": "text", "text": "Let me look that up."},
                {"type": "tool_use", "id": "toolu_1", "name": "geocode",
                 "input": {"address": "Eiffel Tower"}}
            ]
        });
        let blocks: Vec<ContentBlock> =
            serde_json::from_value(resp["content"].clone()).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[0], ContentBlock::Text { text } if text == "Let me look that up."));
        assert!(
            matches!(&blocks[1], ContentBlock::ToolUse { id, name, .. } if id == "toolu_1" && name == "geocode")
        );
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(Role::Assistant).unwrap(), "assistant");
    }
}
