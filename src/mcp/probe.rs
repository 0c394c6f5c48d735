use rmcp::service::{ClientInitializeError, ServiceError, ServiceExt};
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;
use tracing::debug;

use crate::config::{ToolProvider, MCP_CAPABILITY_PREFIX};
use crate::error::{Result, TernError};

/// A tool advertised by an MCP provider.
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolSchema {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}

impl McpToolSchema {
    /// Capability name the agent runtime uses for this tool.
    pub fn capability_name(&self, server: &str) -> String {
        format!("{MCP_CAPABILITY_PREFIX}{server}__{}", self.name)
    }
}

/// Launch a stdio provider, list its tools, shut it down.
pub async fn list_stdio_tools(server: &str, provider: &ToolProvider) -> Result<Vec<McpToolSchema>> {
    let ToolProvider::Stdio { command, args, env } = provider else {
        return Err(TernError::InvalidArgument(format!(
            "provider {server} is not a stdio provider"
        )));
    };

    let mut cmd = Command::new(command);
    cmd.args(args).envs(env);
    let transport = TokioChildProcess::new(cmd).map_err(|e| TernError::Provider {
        provider: "mcp".into(),
        message: format!("failed to launch {server} (`{command}`): {e}"),
    })?;

    debug!(server, command = %command, "probing MCP provider");
    let service = ()
        .serve(transport)
        .await
        .map_err(map_client_initialize_error)?;

    let tools = service
        .list_all_tools()
        .await
        .map_err(|e| map_service_error("list_tools", e));
    if let Err(e) = service.cancel().await {
        debug!(server, error = %e, "MCP provider did not shut down cleanly");
    }

    Ok(tools?.into_iter().map(map_mcp_tool_schema).collect())
}

fn map_mcp_tool_schema(tool: rmcp::model::Tool) -> McpToolSchema {
    McpToolSchema {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

fn map_client_initialize_error(error: ClientInitializeError) -> TernError {
    match error {
        ClientInitializeError::ConnectionClosed(context) => {
            TernError::Stream(format!("MCP initialize connection closed: {context}"))
        }
        other => TernError::Provider {
            provider: "mcp".into(),
            message: format!("MCP initialize error: {other}"),
        },
    }
}

fn map_service_error(context: &str, error: ServiceError) -> TernError {
    match error {
        ServiceError::McpError(error) => TernError::Provider {
            provider: "mcp".into(),
            message: format!("{context}: MCP error {}: {}", error.code.0, error.message),
        },
        ServiceError::TransportClosed => {
            TernError::Stream(format!("{context}: MCP transport closed"))
        }
        other => TernError::Provider {
            provider: "mcp".into(),
            message: format!("{context}: MCP service error: {other}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostedEndpoint;
    use serde_json::json;

    #[test]
    fn map_mcp_tool_schema_copies_fields() {
        let mut schema = serde_json::Map::new();
        schema.insert("type".into(), json!("object"));
        let tool = rmcp::model::Tool::new("codex", "Run a Codex session", schema);

        let mapped = map_mcp_tool_schema(tool);
        assert_eq!(mapped.name, "codex");
        assert_eq!(mapped.description.as_deref(), Some("Run a Codex session"));
        assert_eq!(mapped.input_schema["type"], "object");
        assert_eq!(mapped.capability_name("codex"), "mcp__codex__codex");
    }

    #[test]
    fn transport_closed_maps_to_stream_error() {
        let err = map_service_error("list_tools", ServiceError::TransportClosed);
        assert!(matches!(err, TernError::Stream(m) if m.contains("list_tools")));
    }

    #[tokio::test]
    async fn http_providers_cannot_be_probed() {
        let provider = ToolProvider::Http(
            HostedEndpoint::builder()
                .base_url("https://tools.example.com")
                .build(),
        );
        let err = list_stdio_tools("remote", &provider).await.unwrap_err();
        assert!(matches!(err, TernError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn missing_command_is_a_collaborator_error() {
        let provider = ToolProvider::stdio("/nonexistent/tern-mcp-server", Vec::<String>::new());
        let err = list_stdio_tools("ghost", &provider).await.unwrap_err();
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("ghost"));
    }
}
