//! Conversation model shared by the orchestrator and engine providers.
//!
//! Messages serialize directly to the Anthropic Messages API shape, so
//! providers send the history without a translation layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One unit of message content.
///
/// Closed union: adding a block kind is a compile-time-visible change and
/// every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

/// Ordered, append-only message history for a single query.
///
/// Created fresh per user query; messages are never mutated or reordered
/// after being appended.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user's raw query text.
    pub fn push_user_text(&mut self, text: impl Into<String>) {
        self.messages.push(Message {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        });
    }

    /// Append an assistant message with the given blocks.
    pub fn push_assistant(&mut self, content: Vec<ContentBlock>) {
        self.messages.push(Message {
            role: Role::Assistant,
            content,
        });
    }

    /// Append a tool result as a user message referencing the triggering
    /// tool-use id.
    pub fn push_tool_result(
        &mut self,
        tool_use_id: impl Into<String>,
        content: impl Into<String>,
        is_error: bool,
    ) {
        self.messages.push(Message {
            role: Role::User,
            content: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error,
            }],
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_wire_shape() {
        let mut conv = Conversation::new();
        conv.push_user_text("Where is the Eiffel Tower?");
        let json = serde_json::to_value(&conv.messages()[0]).unwrap();
        assert_eq!(
            json,
            json!({
                "role": "user",
                "content": [{"type": "text", "text": "Where is the Eiffel Tower?"}]
            })
        );
    }

    #[test]
    fn test_tool_use_block_wire_shape() {
        let block = ContentBlock::ToolUse {
            id: "toolu_1".to_string(),
            name: "geocode".to_string(),
            input: json!({"address": "Eiffel Tower"}),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "tool_use");
        assert_eq!(json["name"], "geocode");
        assert_eq!(json["input"]["address"], "Eiffel Tower");
    }

    #[test]
    fn test_tool_result_omits_is_error_when_false() {
        let mut conv = Conversation::new();
        conv.push_tool_result("toolu_1", "48.858, 2.294", false);
        let json = serde_json::to_value(&conv.messages()[0]).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "tool_result");
        assert_eq!(json["content"][0]["tool_use_id"], "toolu_1");
        assert!(json["content"][0].get("is_error").is_none());
    }

    #[test]
    fn test_tool_result_keeps_is_error_when_true() {
        let mut conv = Conversation::new();
        conv.push_tool_result("toolu_1", "Error: boom", true);
        let json = serde_json::to_value(&conv.messages()[0]).unwrap();
        assert_eq!(json["content"][0]["is_error"], true);
    }

    #[test]
    fn test_content_block_roundtrip_from_api_response() {
        let blocks: Vec<ContentBlock> = serde_json::from_value(json!([
            {"type": "text", "text": "Let me check."},
            {"type": "tool_use", "id": "toolu_1", "name": "geocode", "input": {"address": "Paris"}}
        ]))
        .unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(&blocks[1], ContentBlock::ToolUse { name, .. } if name == "geocode"));
    }
}
