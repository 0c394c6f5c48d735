//! Agent runtimes: the external collaborators that execute a turn.

pub mod claude_cli;

pub use claude_cli::ClaudeCliRuntime;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::Session;
use crate::error::Result;
use crate::types::AgentEvent;

/// Lazy, finite, non-restartable sequence of events for one turn.
pub type EventStream = BoxStream<'static, Result<AgentEvent>>;

/// Something that can run one streamed agent turn.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Start a turn and return its event stream.
    ///
    /// The prompt is passed through unchanged, empty or not.
    async fn query(&self, session: &Session, prompt: &str) -> Result<EventStream>;
}
