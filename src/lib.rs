//! tern: run one agent turn and drain its output.
//!
//! A turn is configured with a [`config::SessionConfig`], started against an
//! external agent runtime, and rendered to the console as it streams back.
//! Two shapes are supported: a streamed event sequence
//! ([`turn::TurnRunner::stream`]) and a single awaited result
//! ([`turn::TurnRunner::single_shot`]).
//!
//! # Quick Start
//!
//! ```no_run
//! use tern::prelude::*;
//!
//! # async fn example() -> tern::error::Result<()> {
//! let config = tern::demos::codex_mcp_session();
//! let runtime = ClaudeCliRuntime::new();
//! let mut stdout = std::io::stdout();
//! TurnRunner::default()
//!     .stream(&runtime, &config, "Use codex mcp to write a c++ helloworld", &mut stdout)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod demos;
pub mod error;
pub mod output;
pub mod prelude;
pub mod responses;
pub mod runtime;
pub mod tools;
pub mod turn;
pub mod types;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "cli")]
pub mod cli;
