//! Ready-made sessions for the two bundled interactions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{Environment, HostedEndpoint, SessionConfig, ToolProvider, ValueSource};
use crate::error::Result;
use crate::responses::{Agent, ResponsesClient, ResponsesRunner};
use crate::tools::{FunctionTool, Tool, ToolParameters};

pub const CODEX_PROMPT: &str = "Use codex mcp to write a c++ helloworld";

/// Codex registered as a stdio MCP provider; the whole server is allowed so
/// both `codex` and `codex-reply` are usable.
pub fn codex_mcp_session() -> SessionConfig {
    SessionConfig::builder()
        .allow_tool("mcp__codex")
        .provider(
            "codex",
            ToolProvider::stdio(
                "npx",
                [
                    "-y",
                    "@openai/codex",
                    "-c",
                    "model_provider=\"amd-openai\"",
                    "mcp-server",
                ],
            ),
        )
        .build()
}

pub const WEATHER_PROMPT: &str = "What's the weather in Tokyo?";
pub const AMD_LLM_BASE_URL: &str = "https://llm-api.amd.com/OpenAI";
pub const AMD_LLM_API_VERSION: &str = "2025-04-01-preview";
pub const AMD_LLM_API_KEY_ENV: &str = "AMD_LLM_API_KEY";
pub const WEATHER_MODEL: &str = "gpt-5.1-codex-max";

/// The gateway ignores the nominal api key and authenticates on the
/// subscription-key header instead.
pub fn amd_llm_endpoint() -> HostedEndpoint {
    HostedEndpoint::builder()
        .base_url(AMD_LLM_BASE_URL)
        .api_version(AMD_LLM_API_VERSION)
        .api_key(ValueSource::literal("dummy"))
        .headers(BTreeMap::from([(
            "Ocp-Apim-Subscription-Key".to_string(),
            ValueSource::env(AMD_LLM_API_KEY_ENV),
        )]))
        .build()
}

pub fn get_weather_tool() -> FunctionTool {
    FunctionTool::sync(
        "get_weather",
        "Get the current weather for a city.",
        ToolParameters::object().string("city", "City name", true).build(),
        |args| {
            let city = args.get_str("city")?;
            tracing::debug!(city, "getting weather");
            Ok(format!("The weather in {city} is sunny."))
        },
    )
}

pub fn weather_agent() -> Agent {
    Agent::builder()
        .name("Assistant")
        .instructions("You only respond in haikus.")
        .model(WEATHER_MODEL)
        .tools(vec![Arc::new(get_weather_tool()) as Arc<dyn Tool>])
        .build()
}

/// Runner for the weather agent. Fails with a configuration error when
/// `AMD_LLM_API_KEY` is unset, before any request is made.
pub fn weather_runner(env: &dyn Environment) -> Result<ResponsesRunner> {
    let endpoint = amd_llm_endpoint().resolve(env)?;
    Ok(ResponsesRunner::new(ResponsesClient::new(endpoint), weather_agent()))
}
