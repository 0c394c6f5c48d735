//! Core types.

pub mod event;

pub use event::{AgentEvent, AssistantMessage, ContentBlock, ResultMessage};
