//! Error types for tern.

use thiserror::Error;

/// Primary error type for all tern operations.
#[derive(Error, Debug)]
pub enum TernError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration error: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Process `{command}` exited with {}: {stderr}", code.map(|c| format!("status {c}")).unwrap_or_else(|| "a signal".into()))]
    Process {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Provider error: {provider} — {message}")]
    Provider { provider: String, message: String },

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Max turns ({0}) exceeded")]
    MaxTurnsExceeded(u32),
}

/// Broad error category.
///
/// Configuration errors are raised before any I/O. Everything surfaced by the
/// agent runtime, a tool subprocess or a hosted endpoint is a collaborator
/// error and is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Collaborator,
}

impl TernError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn missing_credential(var: impl Into<String>) -> Self {
        Self::MissingCredential { var: var.into() }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::MissingCredential { .. } => {
                ErrorCategory::Configuration
            }
            _ => ErrorCategory::Collaborator,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Process exit code for this error: 2 for configuration, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::Collaborator => 1,
        }
    }
}

impl From<toml::de::Error> for TernError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(format!("invalid session file: {error}"))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TernError>;
