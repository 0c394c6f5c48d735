//! Secrets and where they come from.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TernError};

/// Source of environment variables used while resolving a session.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// A resolved secret string. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read a required credential from the environment.
    ///
    /// An unset or empty variable is a configuration error.
    pub fn from_env(env: &dyn Environment, var: &str) -> Result<Self> {
        match env.var(var) {
            Some(value) if !value.is_empty() => Ok(Self(value)),
            _ => Err(TernError::missing_credential(var)),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// A configured value: either written inline or read from an env var.
///
/// In TOML: `api_key = "dummy"` or `api_key = { env = "AMD_LLM_API_KEY" }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    Literal(String),
    Env { env: String },
}

impl ValueSource {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn env(var: impl Into<String>) -> Self {
        Self::Env { env: var.into() }
    }

    pub fn resolve(&self, env: &dyn Environment) -> Result<Credential> {
        match self {
            Self::Literal(value) => Ok(Credential::new(value.clone())),
            Self::Env { env: var } => Credential::from_env(env, var),
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Literal(..)"),
            Self::Env { env } => f.debug_struct("Env").field("env", env).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_env_reads_present_variable() {
        let env = env(&[("AMD_LLM_API_KEY", "secret")]);
        let credential = Credential::from_env(&env, "AMD_LLM_API_KEY").unwrap();
        assert_eq!(credential.expose(), "secret");
    }

    #[test]
    fn from_env_rejects_missing_and_empty() {
        let missing = Credential::from_env(&env(&[]), "AMD_LLM_API_KEY").unwrap_err();
        assert!(matches!(
            missing,
            TernError::MissingCredential { ref var } if var == "AMD_LLM_API_KEY"
        ));

        let empty = Credential::from_env(&env(&[("AMD_LLM_API_KEY", "")]), "AMD_LLM_API_KEY")
            .unwrap_err();
        assert!(empty.is_configuration());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let credential = Credential::new("top-secret");
        assert_eq!(format!("{credential:?}"), "Credential(****)");

        let literal = ValueSource::literal("top-secret");
        assert!(!format!("{literal:?}").contains("top-secret"));
        assert!(format!("{:?}", ValueSource::env("KEY")).contains("KEY"));
    }

    #[test]
    fn value_source_parses_both_toml_shapes() {
        #[derive(Deserialize)]
        struct Holder {
            a: ValueSource,
            b: ValueSource,
        }
        let holder: Holder = toml::from_str("a = \"dummy\"\nb = { env = \"KEY\" }\n").unwrap();
        assert_eq!(holder.a, ValueSource::literal("dummy"));
        assert_eq!(holder.b, ValueSource::env("KEY"));
    }
}
