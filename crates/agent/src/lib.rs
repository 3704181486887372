pub mod catalog;
pub mod conversation;
pub mod engine;
pub mod orchestrator;

pub use catalog::{ToolCatalog, ToolDefinition};
pub use conversation::{ContentBlock, Conversation, Message, Role};
pub use engine::{EngineError, ReasoningEngine};
pub use orchestrator::Orchestrator;
