//! Tool-provider descriptors.

use std::collections::BTreeMap;

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::credential::{Credential, Environment, ValueSource};
use crate::error::Result;

/// How the agent runtime reaches an external tool provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolProvider {
    /// Launch a subprocess and speak MCP over its stdin/stdout.
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
    },
    /// Call a hosted endpoint.
    Http(HostedEndpoint),
}

impl ToolProvider {
    pub fn stdio<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Stdio {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: BTreeMap::new(),
        }
    }

    pub(crate) fn resolve(&self, env: &dyn Environment) -> Result<ResolvedProvider> {
        Ok(match self {
            Self::Stdio { command, args, env: vars } => ResolvedProvider::Stdio {
                command: command.clone(),
                args: args.clone(),
                env: vars.clone(),
            },
            Self::Http(endpoint) => ResolvedProvider::Http(endpoint.resolve(env)?),
        })
    }
}

/// A hosted HTTP(S) collaborator: a tool server or a model endpoint.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct HostedEndpoint {
    #[builder(into)]
    #[serde(alias = "url")]
    pub base_url: String,
    #[builder(into)]
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub api_key: Option<ValueSource>,
    /// Extra headers, e.g. a subscription key carried separately from the
    /// nominal api key.
    #[builder(default)]
    #[serde(default)]
    pub headers: BTreeMap<String, ValueSource>,
}

impl HostedEndpoint {
    pub fn resolve(&self, env: &dyn Environment) -> Result<Endpoint> {
        let api_key = self.api_key.as_ref().map(|k| k.resolve(env)).transpose()?;
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.resolve(env)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Endpoint {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_version: self.api_version.clone(),
            api_key,
            headers,
        })
    }
}

/// A provider whose secrets have been read.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedProvider {
    Stdio {
        command: String,
        args: Vec<String>,
        env: BTreeMap<String, String>,
    },
    Http(Endpoint),
}

/// A hosted endpoint whose secrets have been read.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub base_url: String,
    pub api_version: Option<String>,
    pub api_key: Option<Credential>,
    pub headers: Vec<(String, Credential)>,
}
