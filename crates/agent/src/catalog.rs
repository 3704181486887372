//! Tool catalog: the session's advertised tools in engine-facing shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use toolchat_mcp::{ProtocolError, Session, ToolDescriptor};

/// A tool's interface as the reasoning engine expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the expected input.
    pub input_schema: Value,
}

impl From<ToolDescriptor> for ToolDefinition {
    fn from(descriptor: ToolDescriptor) -> Self {
        Self {
            name: descriptor.name,
            description: descriptor.description,
            input_schema: descriptor.input_schema,
        }
    }
}

/// Snapshot of the tools a session advertises, in server order.
///
/// Built once per session and handed to the orchestrator unchanged per
/// conversation; tools are assumed stable for the session's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Fetch the tool listing from the session and snapshot it.
    pub async fn fetch(session: &mut Session) -> Result<Self, ProtocolError> {
        let descriptors = session.list_tools().await?;
        tracing::info!(count = descriptors.len(), "tool catalog built");
        Ok(Self {
            tools: descriptors.into_iter().map(ToolDefinition::from).collect(),
        })
    }

    /// Build a catalog from already-known definitions.
    pub fn from_definitions(tools: Vec<ToolDefinition>) -> Self {
        Self { tools }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: format!("{name} tool"),
            input_schema: json!({"type": "object"}),
        }
    }

    #[test]
    fn test_definition_from_descriptor() {
        let def = ToolDefinition::from(descriptor("geocode"));
        assert_eq!(def.name, "geocode");
        assert_eq!(def.description, "geocode tool");
        assert_eq!(def.input_schema, json!({"type": "object"}));
    }

    #[test]
    fn test_definition_serializes_snake_case_schema() {
        let def = ToolDefinition::from(descriptor("geocode"));
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("input_schema"));
        assert!(!json.contains("inputSchema"));
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = ToolCatalog::from_definitions(
            vec![descriptor("zeta"), descriptor("alpha")]
                .into_iter()
                .map(ToolDefinition::from)
                .collect(),
        );
        assert_eq!(catalog.names(), vec!["zeta", "alpha"]);
    }
}
