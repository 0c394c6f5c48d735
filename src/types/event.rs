//! Events streamed back during an agent turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TernError};

/// One event produced by the agent runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A chunk of assistant content.
    Assistant(AssistantMessage),
    /// Terminal summary of the turn.
    Result(ResultMessage),
    /// Anything else the runtime emits (system, user echo, stream deltas).
    Other(Value),
}

/// Assistant content chunk.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssistantMessage {
    pub content: Vec<ContentBlock>,
    pub model: Option<String>,
}

impl AssistantMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            model: None,
        }
    }

    /// Text blocks in order, skipping everything else.
    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other(_) => None,
        })
    }
}

/// A typed content block. Only plain text is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text { text: String },
    Other(Value),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    fn from_value(value: Value) -> Self {
        if value.get("type").and_then(Value::as_str) == Some("text") {
            if let Some(text) = value.get("text").and_then(Value::as_str) {
                return Self::text(text);
            }
        }
        Self::Other(value)
    }
}

/// Terminal result of a turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub num_turns: u32,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

impl ResultMessage {
    pub fn with_cost(cost: f64) -> Self {
        Self {
            subtype: "success".into(),
            total_cost_usd: Some(cost),
            ..Default::default()
        }
    }

    /// Cost worth reporting: present and strictly positive.
    pub fn billable_cost(&self) -> Option<f64> {
        self.total_cost_usd.filter(|cost| *cost > 0.0)
    }
}

impl AgentEvent {
    /// Interpret one `stream-json` message.
    pub fn from_value(value: Value) -> Result<Self> {
        match value.get("type").and_then(Value::as_str) {
            Some("assistant") => {
                let message = value.get("message").ok_or_else(|| {
                    TernError::Protocol("assistant event without `message`".into())
                })?;
                let content = message
                    .get("content")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        TernError::Protocol("assistant message without `content` array".into())
                    })?
                    .iter()
                    .cloned()
                    .map(ContentBlock::from_value)
                    .collect();
                let model = message
                    .get("model")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(Self::Assistant(AssistantMessage { content, model }))
            }
            Some("result") => Ok(Self::Result(serde_json::from_value(value)?)),
            Some(_) => Ok(Self::Other(value)),
            None => Err(TernError::Protocol(format!(
                "message without a `type` field: {value}"
            ))),
        }
    }

    /// Parse one line of runtime output. Blank lines yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(line).map_err(|e| {
            TernError::Protocol(format!("malformed runtime message ({e}): {line}"))
        })?;
        Self::from_value(value).map(Some)
    }
}
