//! Convenience re-exports for common use.

pub use crate::config::{HostedEndpoint, SessionConfig, ToolProvider, ValueSource};
pub use crate::error::{Result, TernError};
pub use crate::output::Drainer;
pub use crate::responses::{Agent, ResponsesClient, ResponsesRunner, SingleShotRunner};
pub use crate::runtime::{AgentRuntime, ClaudeCliRuntime};
pub use crate::tools::{FunctionTool, Tool, ToolArguments, ToolParameters};
pub use crate::turn::TurnRunner;
pub use crate::types::{AgentEvent, ContentBlock};
