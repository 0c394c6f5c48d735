//! Claude Code CLI driven in `stream-json` mode.

use std::process::Stdio;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio_stream::wrappers::LinesStream;
use tracing::debug;

use super::{AgentRuntime, EventStream};
use crate::config::{Environment, ResolvedProvider, Session};
use crate::error::{Result, TernError};
use crate::types::AgentEvent;

const DEFAULT_EXECUTABLE: &str = "claude";
const EXECUTABLE_ENV: &str = "CLAUDE_CLI_PATH";
const ENTRYPOINT: &str = "sdk-rs";

/// Launches the `claude` CLI once per turn and parses its stdout.
#[derive(Debug, Clone)]
pub struct ClaudeCliRuntime {
    executable: String,
}

impl Default for ClaudeCliRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaudeCliRuntime {
    pub fn new() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
        }
    }

    /// Use `CLAUDE_CLI_PATH` when set.
    pub fn from_env(env: &dyn Environment) -> Self {
        match env.var(EXECUTABLE_ENV).filter(|p| !p.is_empty()) {
            Some(path) => Self::new().with_executable(path),
            None => Self::new(),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Command-line arguments for one turn.
    pub fn build_args(session: &Session, prompt: &str) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--output-format".into(),
            "stream-json".into(),
            "--verbose".into(),
        ];

        if let Some(system_prompt) = &session.system_prompt {
            args.extend(["--system-prompt".into(), system_prompt.clone()]);
        }
        if !session.allowed_tools.is_empty() {
            args.extend(["--allowedTools".into(), session.allowed_tools.join(",")]);
        }
        if let Some(turns) = session.max_turns {
            args.extend(["--max-turns".into(), turns.to_string()]);
        }
        if let Some(model) = &session.model {
            args.extend(["--model".into(), model.clone()]);
        }
        if let Some(mode) = session.permission_mode {
            args.extend(["--permission-mode".into(), mode.to_string()]);
        }
        if !session.providers.is_empty() {
            args.extend(["--mcp-config".into(), mcp_config(session).to_string()]);
        }

        args.extend(["--print".into(), "--".into(), prompt.to_string()]);
        args
    }

    fn spawn(&self, session: &Session, prompt: &str) -> Result<Child> {
        let mut command = Command::new(&self.executable);
        command
            .args(Self::build_args(session, prompt))
            .env("CLAUDE_CODE_ENTRYPOINT", ENTRYPOINT)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &session.cwd {
            command.current_dir(cwd);
        }

        command.spawn().map_err(|e| TernError::Provider {
            provider: "claude-cli".into(),
            message: format!("failed to launch `{}`: {e}", self.executable),
        })
    }
}

/// The `--mcp-config` document for a session's providers.
pub fn mcp_config(session: &Session) -> Value {
    let servers: Map<String, Value> = session
        .providers
        .iter()
        .map(|(name, provider)| (name.clone(), provider_entry(provider)))
        .collect();
    json!({ "mcpServers": servers })
}

fn provider_entry(provider: &ResolvedProvider) -> Value {
    match provider {
        ResolvedProvider::Stdio { command, args, env } => {
            let mut entry = json!({
                "type": "stdio",
                "command": command,
                "args": args,
            });
            if !env.is_empty() {
                entry["env"] = json!(env);
            }
            entry
        }
        ResolvedProvider::Http(endpoint) => {
            let mut headers: Map<String, Value> = endpoint
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.expose().to_string())))
                .collect();
            if let Some(key) = &endpoint.api_key {
                let has_auth = headers
                    .keys()
                    .any(|name| name.eq_ignore_ascii_case("authorization"));
                if !has_auth {
                    headers.insert(
                        "Authorization".into(),
                        Value::String(format!("Bearer {}", key.expose())),
                    );
                }
            }
            json!({
                "type": "http",
                "url": endpoint.base_url,
                "headers": headers,
            })
        }
    }
}

fn read_events(mut child: Child, command: String) -> impl Stream<Item = Result<AgentEvent>> + Send {
    try_stream! {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TernError::Stream("runtime stdout was not captured".into()))?;
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let mut lines = LinesStream::new(BufReader::new(stdout).lines());
        while let Some(line) = lines.next().await {
            let line = line?;
            if let Some(event) = AgentEvent::parse_line(&line)? {
                yield event;
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let stderr = stderr_task.await.unwrap_or_default();
            Err::<(), _>(TernError::Process {
                command,
                code: status.code(),
                stderr: stderr.trim().to_string(),
            })?;
        }
        debug!("runtime exited cleanly");
    }
}

#[async_trait]
impl AgentRuntime for ClaudeCliRuntime {
    fn name(&self) -> &str {
        "claude-cli"
    }

    async fn query(&self, session: &Session, prompt: &str) -> Result<EventStream> {
        debug!(
            executable = %self.executable,
            providers = session.providers.len(),
            allowed_tools = session.allowed_tools.len(),
            "launching agent runtime"
        );
        let child = self.spawn(session, prompt)?;
        Ok(Box::pin(read_events(child, self.executable.clone())))
    }
}
