//! Session configuration.
//!
//! A [`SessionConfig`] is declarative: it names the capabilities an agent may
//! use, how to reach its tool providers and which model to run. Secrets are
//! referenced, not stored; [`SessionConfig::resolve`] reads them and yields a
//! [`Session`] ready for a single turn. Resolution is the only place a
//! missing credential is detected, and it happens before any I/O.

pub mod credential;
pub mod provider;

pub use credential::{Credential, Environment, ProcessEnv, ValueSource};
pub use provider::{Endpoint, HostedEndpoint, ResolvedProvider, ToolProvider};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Result;

/// Prefix the agent runtime uses for capabilities served by an MCP provider.
pub const MCP_CAPABILITY_PREFIX: &str = "mcp__";

/// Tool permission handling requested from the agent runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PermissionMode {
    Default,
    AcceptEdits,
    Plan,
    BypassPermissions,
}

/// Immutable description of one agent turn's environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    allowed_tools: Vec<String>,
    #[serde(default, alias = "mcp_servers")]
    tool_providers: BTreeMap<String, ToolProvider>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    system_prompt: Option<String>,
    #[serde(default)]
    max_turns: Option<u32>,
    #[serde(default)]
    permission_mode: Option<PermissionMode>,
    #[serde(default)]
    cwd: Option<PathBuf>,
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Parse a session from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.warn_unsatisfied();
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::error::TernError::Configuration(format!(
                "cannot read session file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn allowed_tools(&self) -> &[String] {
        &self.allowed_tools
    }

    pub fn tool_providers(&self) -> &BTreeMap<String, ToolProvider> {
        &self.tool_providers
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Copy of this config with a different model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..self.clone()
        }
    }

    /// Allow-list entries that name an MCP provider this config does not have.
    ///
    /// Names without the `mcp__` prefix are runtime built-ins and are
    /// always considered satisfiable.
    pub fn unsatisfied_capabilities(&self) -> Vec<&str> {
        self.allowed_tools
            .iter()
            .filter(|name| match mcp_server_of(name) {
                Some(server) => !self.tool_providers.contains_key(server),
                None => false,
            })
            .map(String::as_str)
            .collect()
    }

    fn warn_unsatisfied(&self) {
        for name in self.unsatisfied_capabilities() {
            tracing::warn!(
                capability = name,
                "allowed capability has no configured provider; the agent will not be able to use it"
            );
        }
    }

    /// Read every referenced secret and produce a [`Session`].
    pub fn resolve(&self, env: &dyn Environment) -> Result<Session> {
        let providers = self
            .tool_providers
            .iter()
            .map(|(name, provider)| Ok((name.clone(), provider.resolve(env)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Session {
            allowed_tools: self.allowed_tools.clone(),
            providers,
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            max_turns: self.max_turns,
            permission_mode: self.permission_mode,
            cwd: self.cwd.clone(),
        })
    }
}

/// Server name for an `mcp__<server>` or `mcp__<server>__<tool>` capability.
pub fn mcp_server_of(capability: &str) -> Option<&str> {
    let rest = capability.strip_prefix(MCP_CAPABILITY_PREFIX)?;
    let server = rest.split("__").next().unwrap_or(rest);
    (!server.is_empty()).then_some(server)
}

/// Builder for [`SessionConfig`].
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Permit one capability.
    pub fn allow_tool(mut self, name: impl Into<String>) -> Self {
        self.config.allowed_tools.push(name.into());
        self
    }

    pub fn allow_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .allowed_tools
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Register a named tool provider. A later registration under the same
    /// name replaces the earlier one.
    pub fn provider(mut self, name: impl Into<String>, provider: ToolProvider) -> Self {
        self.config.tool_providers.insert(name.into(), provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_turns(mut self, turns: u32) -> Self {
        self.config.max_turns = Some(turns);
        self
    }

    pub fn permission_mode(mut self, mode: PermissionMode) -> Self {
        self.config.permission_mode = Some(mode);
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cwd = Some(dir.into());
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config.warn_unsatisfied();
        self.config
    }
}

/// A resolved session: every secret has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub allowed_tools: Vec<String>,
    pub providers: BTreeMap<String, ResolvedProvider>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub max_turns: Option<u32>,
    pub permission_mode: Option<PermissionMode>,
    pub cwd: Option<PathBuf>,
}
