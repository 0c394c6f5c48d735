//! Single-shot agent turns against an OpenAI-compatible Responses endpoint.
//!
//! [`ResponsesRunner::run`] is awaited once and yields the agent's final
//! output. Internally it sends the prompt, executes any function calls the
//! model requests with the agent's [`Tool`]s, and re-sends until the model
//! answers without calling a tool. No conversation state survives the call.

pub mod client;

pub use client::{ResponsesApiResponse, ResponsesClient, ResponsesUsage};

use std::sync::Arc;

use async_trait::async_trait;
use bon::Builder;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, TernError};
use crate::tools::{Tool, ToolArguments, ToolExecutionContext};

/// Default bound on model round-trips within one run.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// An agent: a name, instructions, a model and the tools it may call.
#[derive(Builder, Clone)]
pub struct Agent {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub instructions: Option<String>,
    #[builder(into)]
    pub model: String,
    #[builder(default)]
    pub tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Agent {
    fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    fn tool_definitions(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters().schema,
                    "strict": false,
                })
            })
            .collect()
    }
}

/// Final result of a single-shot run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOutput {
    pub final_output: String,
    /// Model round-trips used.
    pub turns: u32,
    pub usage: ResponsesUsage,
}

/// Something that runs one prompt to a final output.
#[async_trait]
pub trait SingleShotRunner: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<RunOutput>;
}

/// Runs an [`Agent`] against a [`ResponsesClient`].
#[derive(Debug)]
pub struct ResponsesRunner {
    client: ResponsesClient,
    agent: Agent,
    max_turns: u32,
}

impl ResponsesRunner {
    pub fn new(client: ResponsesClient, agent: Agent) -> Self {
        Self {
            client,
            agent,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    fn request_body(&self, input: &[Value]) -> Value {
        let mut body = json!({
            "model": self.agent.model,
            "input": input,
        });
        if let Some(instructions) = &self.agent.instructions {
            body["instructions"] = json!(instructions);
        }
        if !self.agent.tools.is_empty() {
            body["tools"] = json!(self.agent.tool_definitions());
        }
        body
    }

    async fn call_tool(&self, call: &FunctionCall) -> Result<String> {
        let tool = self
            .agent
            .tool(&call.name)
            .ok_or_else(|| TernError::ToolExecution {
                tool_name: call.name.clone(),
                message: format!("model called unknown tool on agent {}", self.agent.name),
            })?;
        let ctx = ToolExecutionContext {
            call_id: call.call_id.clone(),
        };
        let outcome = match ToolArguments::from_json_str(&call.arguments) {
            Ok(args) => tool.execute(&args, &ctx).await,
            Err(e) => Err(e),
        };
        // Tool failures go back to the model as text rather than ending the run.
        Ok(outcome.unwrap_or_else(|e| {
            debug!(tool = %call.name, error = %e, "tool failed");
            format!("An error occurred while running the tool. Please try again. Error: {e}")
        }))
    }
}

#[async_trait]
impl SingleShotRunner for ResponsesRunner {
    async fn run(&self, prompt: &str) -> Result<RunOutput> {
        let mut input = vec![json!({ "role": "user", "content": prompt })];
        let mut usage = ResponsesUsage::default();

        for turn in 1..=self.max_turns {
            debug!(agent = %self.agent.name, turn, "requesting model response");
            let response = self.client.create(&self.request_body(&input)).await?;
            if let Some(u) = &response.usage {
                usage.add(u);
            }

            let calls = response.function_calls()?;
            if calls.is_empty() {
                return Ok(RunOutput {
                    final_output: response.output_text(),
                    turns: turn,
                    usage,
                });
            }

            input.extend(response.output.iter().cloned());
            for call in &calls {
                let output = self.call_tool(call).await?;
                input.push(json!({
                    "type": "function_call_output",
                    "call_id": call.call_id,
                    "output": output,
                }));
            }
        }

        Err(TernError::MaxTurnsExceeded(self.max_turns))
    }
}

/// A `function_call` output item.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub call_id: String,
    pub name: String,
    pub arguments: String,
}
