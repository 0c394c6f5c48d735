//! CLI definitions for tern.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SessionConfig;
use crate::demos;
use crate::error::Result;

/// tern CLI
#[derive(Parser, Debug)]
#[command(name = "tern", version, about = "Run one agent turn and print its output")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask Claude to use a Codex MCP server (streamed output)
    CodexMcp(CodexMcpArgs),
    /// Ask a Responses-API agent about the weather (single result)
    Weather(WeatherArgs),
    /// List the tools each stdio provider in a session serves
    Tools(ToolsArgs),
}

/// Arguments for `tern codex-mcp`.
#[derive(Parser, Debug)]
pub struct CodexMcpArgs {
    /// Prompt for the turn
    #[arg(short, long, default_value = demos::CODEX_PROMPT)]
    pub prompt: String,

    /// Session file (TOML) replacing the built-in Codex session
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model for the agent runtime
    #[arg(short, long)]
    pub model: Option<String>,
}

impl CodexMcpArgs {
    pub fn session(&self) -> Result<SessionConfig> {
        let config = match &self.config {
            Some(path) => SessionConfig::from_toml_file(path)?,
            None => demos::codex_mcp_session(),
        };
        Ok(match &self.model {
            Some(model) => config.with_model(model),
            None => config,
        })
    }
}

/// Arguments for `tern weather`.
#[derive(Parser, Debug)]
pub struct WeatherArgs {
    /// Prompt for the turn
    #[arg(short, long, default_value = demos::WEATHER_PROMPT)]
    pub prompt: String,
}

/// Arguments for `tern tools`.
#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Session file (TOML); defaults to the built-in Codex session
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ToolsArgs {
    pub fn session(&self) -> Result<SessionConfig> {
        match &self.config {
            Some(path) => SessionConfig::from_toml_file(path),
            None => Ok(demos::codex_mcp_session()),
        }
    }
}
